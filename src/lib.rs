pub mod app;
pub mod config;
pub mod error;
pub mod state;
pub mod views;

pub mod crypto {
    pub mod signature;
    pub mod token;
}

pub mod extractors {
    pub mod client;
    pub mod payload;
}

pub mod models {
    pub mod notification;
    pub mod session;
}

pub mod store {
    pub mod session;
    pub mod sweeper;
}

pub mod services {
    pub mod checkout;
}

pub mod handlers {
    pub mod checkout;
    pub mod health;
    pub mod notifications;
}

pub mod validation {
    pub mod checkout;
}
