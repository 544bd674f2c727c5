use serde_json::Value;

/// Walks a dotted key path such as `user.profile.name` through nested objects.
pub(super) fn value_at<'json>(json: &'json Value, key_path: &str) -> Option<&'json Value> {
    key_path
        .split('.')
        .try_fold(json, |current, key| current.as_object()?.get(key))
}
