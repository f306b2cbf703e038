use super::connect;

pub async fn handle() -> anyhow::Result<()> {
    let db = connect().await?;
    db.migrate().await?;
    tracing::info!("schema is up to date");
    db.close().await;
    Ok(())
}
