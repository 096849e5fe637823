pub mod console_session;
