pub mod dispatcher;
pub mod handler;

pub use dispatcher::FlowEventDispatcher;
pub use handler::FlowEventHandler;

pub mod impls {
    pub mod log_hook;
}

pub use impls::log_hook::LogHook;
