use kube::{ResourceExt, api::DynamicObject};
use serde_json::Value;

/// Checked access to the `status` of an untyped object.
///
/// Pods are fetched as [`DynamicObject`]s, so `status` only exists as JSON
/// inside `data`. Each accessor reports what is missing instead of panicking.
pub trait StatusView {
    /// Name used to identify the object in errors.
    fn display_name(&self) -> String;

    /// The raw `status` value, if present.
    fn status(&self) -> Option<&Value>;

    /// Returns `status.phase`, or the reason it cannot be read.
    fn phase(&self) -> Result<&str, &'static str> {
        let status = self
            .status()
            .ok_or("missing status")?
            .as_object()
            .ok_or("status is not an object")?;
        status
            .get("phase")
            .ok_or("missing status.phase")?
            .as_str()
            .ok_or("status.phase is not a string")
    }
}

impl StatusView for DynamicObject {
    fn display_name(&self) -> String {
        self.name_any()
    }

    fn status(&self) -> Option<&Value> {
        self.data.get("status")
    }
}

#[cfg(test)]
mod tests {
    use k8s_openapi::api::core::v1::Pod;
    use kube::api::ApiResource;
    use serde_json::json;

    use super::*;

    fn pod(name: &str, data: Value) -> DynamicObject {
        DynamicObject::new(name, &ApiResource::erase::<Pod>(&())).data(data)
    }

    #[test]
    fn reads_phase() {
        let obj = pod("web", json!({ "status": { "phase": "Running" } }));
        assert_eq!(obj.phase(), Ok("Running"));
        assert_eq!(obj.display_name(), "web");
    }

    #[test]
    fn reports_missing_status() {
        let obj = pod("web", json!({ "spec": {} }));
        assert_eq!(obj.phase(), Err("missing status"));
    }

    #[test]
    fn reports_non_object_status() {
        let obj = pod("web", json!({ "status": "Running" }));
        assert_eq!(obj.phase(), Err("status is not an object"));
    }

    #[test]
    fn reports_missing_phase() {
        let obj = pod("web", json!({ "status": { "podIP": "10.0.0.1" } }));
        assert_eq!(obj.phase(), Err("missing status.phase"));
    }

    #[test]
    fn reports_non_string_phase() {
        let obj = pod("web", json!({ "status": { "phase": 3 } }));
        assert_eq!(obj.phase(), Err("status.phase is not a string"));
    }
}
