use rocket::config::Environment as RocketEnv;

/// Rocket environment, tracked as managed state so handlers can tell
/// dev from prod (cookie security, debug logging of sensitive values).
pub struct Environment(pub RocketEnv);
