//! Canned operation bodies.

use crate::request::RpcMethod;

/// Standard datastore names.
pub mod datastores {
    pub const RUNNING: &str = "running";
    pub const CANDIDATE: &str = "candidate";
    pub const STARTUP: &str = "startup";
}

/// `<lock>` on the target datastore.
pub fn lock(target: &str) -> RpcMethod {
    RpcMethod::raw(format!("<lock><target><{}/></target></lock>", target))
}

/// `<unlock>` on the target datastore.
pub fn unlock(target: &str) -> RpcMethod {
    RpcMethod::raw(format!("<unlock><target><{}/></target></unlock>", target))
}

/// `<get-config>` of the whole source datastore.
pub fn get_config(source: &str) -> RpcMethod {
    RpcMethod::raw(format!("<get-config><source><{}/></source></get-config>", source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_bodies() {
        assert_eq!(
            lock(datastores::CANDIDATE).as_str(),
            "<lock><target><candidate/></target></lock>"
        );
        assert_eq!(
            unlock(datastores::CANDIDATE).as_str(),
            "<unlock><target><candidate/></target></unlock>"
        );
        assert_eq!(
            get_config(datastores::RUNNING).as_str(),
            "<get-config><source><running/></source></get-config>"
        );
    }
}
