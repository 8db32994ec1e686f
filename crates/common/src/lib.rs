//! Pieces shared by every crate in the workspace: logging setup and small wire types.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn ready_omits_unchecked_database() {
        let r = types::Ready { status: "ok", database: None };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v, serde_json::json!({"status": "ok"}));
    }
}
