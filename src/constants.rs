pub mod server {
    pub const NAME: &str = "toolserver";
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PROTOCOL_VERSION: &str = "2025-06-18";
}

pub mod network {
    pub const TIMEOUT_CONNECTION_MS: u64 = 5_000;
    pub const MAX_REDIRECTS: usize = 10;
}

pub mod limits {
    pub const MAX_SUGGESTIONS: usize = 5;
    pub const MAX_LISTED_ACTIONS: usize = 24;
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http:", "https:"];
}

pub mod env {
    pub const CONNECTIONS_PATH: &str = "TOOLSERVER_CONNECTIONS";
    pub const TIMEOUT_MS: &str = "TOOLSERVER_TIMEOUT_MS";
    pub const STATE_DIR: &str = "TOOLSERVER_STATE_DIR";
}
