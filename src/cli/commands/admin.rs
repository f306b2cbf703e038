use super::connect;
use crate::database::{AdminRepository, PgStore};

pub async fn handle(username: &str, password: &str) -> anyhow::Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        anyhow::bail!("username and password must not be empty");
    }

    let db = connect().await?;
    db.migrate().await?;

    let admin = PgStore::new(&db).save_admin(username, password).await?;
    println!("Admin '{}' saved (id {})", admin.username, admin.id);

    db.close().await;
    Ok(())
}
