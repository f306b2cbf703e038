//! Server-rendered HTML pages.
//!
//! Pages read through the store directly and write through the JSON API from
//! small inline scripts. Every value taken from the database goes through
//! [`escape_html`].

pub mod admin;
pub mod public;

/// Presence ping: immediately, then every minute until the page is hidden.
/// Failures are ignored.
const VISITOR_TRACKER: &str = r#"<script>
(function () {
  var key = "visitorSessionId";
  var id = localStorage.getItem(key);
  if (!id) {
    id = Math.random().toString(36).substring(2) + Date.now().toString(36);
    localStorage.setItem(key, id);
  }
  function ping() {
    fetch("/api/visitors", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ sessionId: id, pageUrl: window.location.pathname })
    }).catch(function () {});
  }
  ping();
  var timer = setInterval(ping, 60000);
  window.addEventListener("pagehide", function () { clearInterval(timer); });
})();
</script>"#;

/// Form helper shared by the admin pages: `data-method`/`data-action` on a
/// form send its fields as JSON, then reload.
const JSON_FORMS: &str = r#"<script>
document.addEventListener("submit", function (event) {
  var form = event.target;
  if (!form.dataset.action) return;
  event.preventDefault();
  var body = {};
  new FormData(form).forEach(function (value, name) {
    if (name === "skills") {
      (body.skills = body.skills || []).push(parseInt(value, 10));
    } else if (value !== "") {
      body[name] = value;
    }
  });
  if (form.dataset.list === "skills" && !body.skills) body.skills = [];
  fetch(form.dataset.action, {
    method: form.dataset.method || "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body)
  }).then(function (res) {
    return res.json().then(function (data) {
      if (!res.ok) throw new Error(data.error || "Request failed");
      if (form.dataset.redirect) window.location.assign(form.dataset.redirect);
      else window.location.reload();
    });
  }).catch(function (err) {
    var out = form.querySelector(".error");
    if (out) out.textContent = err.message;
  });
});
</script>"#;

/// Wrap page content in the shared document shell
pub fn layout(title: &str, body: &str, admin: bool) -> String {
    let nav = if admin {
        r#"<nav><a href="/admin/dashboard">Dashboard</a> <a href="/admin/skills">Skills</a> <a href="/admin/projects">Projects</a> <a href="/admin/messages">Messages</a> <form data-action="/api/auth/logout" data-redirect="/admin/login" style="display:inline"><button>Log out</button></form></nav>"#
    } else {
        r#"<nav><a href="/">Home</a> <a href="/projects">Projects</a></nav>"#
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{title}</title>\n</head>\n<body>\n{nav}\n<main>\n{body}\n</main>\n{VISITOR_TRACKER}\n{JSON_FORMS}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
