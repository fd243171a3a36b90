//! Server assembly: owns the listener, the session registry, and the
//! match coordinator; spawns one handler task per accepted connection.

use std::sync::{Arc, Mutex};

use somnia_battle::{Coordinator, InventoryProvider, MatchConfig, Presence};
use somnia_protocol::PlayerId;
use somnia_session::{Authenticator, SessionManager};
use somnia_transport::{Connection, Transport, WebSocketTransport};

use crate::error::SomniaError;
use crate::handler;

/// Wire protocol version accepted in handshakes.
pub const PROTOCOL_VERSION: u32 = 1;

/// State shared by every connection handler.
pub(crate) struct ServerState<A> {
    pub sessions: Arc<Mutex<SessionManager>>,
    pub coordinator: Arc<Coordinator>,
    pub auth: A,
}

/// Presence adapter: lets the coordinator flip the in-battle flag on
/// the session registry without the battle crate knowing about it.
struct SessionPresence {
    sessions: Arc<Mutex<SessionManager>>,
}

impl SessionPresence {
    fn locked(&self) -> std::sync::MutexGuard<'_, SessionManager> {
        self.sessions.lock().expect("session lock poisoned")
    }
}

impl Presence for SessionPresence {
    fn set_in_battle(&self, player: PlayerId, in_battle: bool) {
        self.locked().set_in_battle(player, in_battle);
    }

    fn is_in_battle(&self, player: PlayerId) -> bool {
        self.locked().is_in_battle(player)
    }
}

/// The assembled server, ready to accept connections.
pub struct Server<A> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A>>,
}

impl<A: Authenticator> Server<A> {
    /// Binds the listener and starts the background pairing loop.
    pub async fn bind(
        addr: &str,
        config: MatchConfig,
        auth: A,
        inventories: Arc<dyn InventoryProvider>,
    ) -> Result<Self, SomniaError> {
        let transport = WebSocketTransport::bind(addr).await?;
        let sessions = Arc::new(Mutex::new(SessionManager::new()));
        let presence = Arc::new(SessionPresence {
            sessions: Arc::clone(&sessions),
        });
        let coordinator = Coordinator::new(config, presence, inventories);
        coordinator.start_pairing();

        Ok(Self {
            transport,
            state: Arc::new(ServerState {
                sessions,
                coordinator,
                auth,
            }),
        })
    }

    /// The address the listener actually bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Accepts connections forever, one handler task each.
    pub async fn run(mut self) -> Result<(), SomniaError> {
        loop {
            let connection = self.transport.accept().await?;
            let state = Arc::clone(&self.state);
            tokio::spawn(async move {
                let id = connection.id();
                if let Err(error) =
                    handler::handle_connection(state, connection).await
                {
                    tracing::debug!(%id, %error, "connection ended with error");
                }
            });
        }
    }
}
