use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::engine::Engine;
use crate::http::connection::Connection;

pub async fn run(engine: Arc<Engine>, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    serve(listener, engine).await
}

/// Accept loop on an already bound listener; one task per connection.
pub async fn serve(listener: TcpListener, engine: Arc<Engine>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, engine);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
