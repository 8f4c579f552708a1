use std::sync::Arc;

use crate::error::{Error, Result};
use crate::server;
use crate::services::EastmoneyClient;

pub fn run(port: u16) {
    println!("🚀 Starting asharedata chart server on port {}", port);

    if let Err(e) = run_server(port) {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}

fn run_server(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create runtime: {}", e)))?;

    runtime.block_on(async {
        let client = EastmoneyClient::new(true)
            .map_err(|e| Error::Config(format!("Failed to create Eastmoney client: {}", e)))?;
        server::serve(Arc::new(client), port).await
    })
}
