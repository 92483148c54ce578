use log::{error, info};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::handle_client;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::Dispatcher;

pub struct Server {
    dispatcher: Arc<Dispatcher>,
    listener: TcpListener,
    config: Arc<RelayConfig>,
}

impl Server {
    /// Binds the listener and builds the chatroom from `config`.
    pub async fn bind(config: RelayConfig) -> Result<Self, RelayError> {
        let socket = config.socket_addr();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };
        info!("Relay bound to {}", listener.local_addr()?);

        Ok(Self {
            dispatcher: Arc::new(Dispatcher::from_config(&config)),
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    /// Serves until Ctrl-C.
    pub async fn start(self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;
    }

    /// Accepts connections until `shutdown` resolves, then closes the
    /// chatroom.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting chatroom relay on {} (max {} clients, {} byte mailboxes, {:?} on overflow)",
            self.config.socket_addr(),
            self.dispatcher.stats().usable_slots,
            self.config.mailbox_capacity,
            self.config.overflow_policy
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!("New connection: {}", addr);
                        let dispatcher = Arc::clone(&self.dispatcher);

                        // Spawn a task for each client so accept loop doesn't block
                        tokio::spawn(async move {
                            handle_client(stream, addr, dispatcher).await;
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                },
                _ = &mut shutdown => {
                    info!("Shutting down chatroom relay");
                    break;
                }
            }
        }

        self.dispatcher.close();
    }
}
