//! Field path resolution over nested documents
//!
//! All walks are iterative over the path segments. A missing segment, or an
//! intermediate value that is not an object, means "absent": lookups return
//! `None` and mutations do nothing.

use crate::domain::{Document, FieldPath};
use serde_json::{Map, Value};

/// Returns the value at `path`, if present
pub fn get_at<'a>(doc: &'a Document, path: &FieldPath) -> Option<&'a Value> {
    container(doc, path.parents())?.get(path.leaf())
}

/// Returns true if a value (including `null`) is stored at `path`
pub fn exists_at(doc: &Document, path: &FieldPath) -> bool {
    get_at(doc, path).is_some()
}

/// Mutable access to the value at `path`, if present
pub fn get_at_mut<'a>(doc: &'a mut Document, path: &FieldPath) -> Option<&'a mut Value> {
    container_mut(doc, path.parents())?.get_mut(path.leaf())
}

/// Removes the value at `path`
///
/// After a successful removal, every parent object along the path that is
/// now empty is removed too, deepest first. Returns true if the leaf existed.
pub fn delete_at(doc: &mut Document, path: &FieldPath) -> bool {
    let removed = container_mut(doc, path.parents())
        .and_then(|parent| parent.shift_remove(path.leaf()))
        .is_some();
    if !removed {
        return false;
    }

    let parents = path.parents();
    for depth in (0..parents.len()).rev() {
        let Some(holder) = container_mut(doc, &parents[..depth]) else {
            break;
        };
        let emptied = holder
            .get(&parents[depth])
            .and_then(Value::as_object)
            .is_some_and(Map::is_empty);
        if !emptied {
            break;
        }
        holder.shift_remove(&parents[depth]);
    }

    true
}

/// Stores `value` at `path`, creating missing intermediate objects
///
/// Returns false, leaving the document untouched, when an existing
/// intermediate value is not an object.
pub fn insert_at(doc: &mut Document, path: &FieldPath, value: Value) -> bool {
    let mut current = doc;
    for segment in path.parents() {
        let next = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        match next.as_object_mut() {
            Some(object) => current = object,
            None => return false,
        }
    }
    current.insert(path.leaf().to_string(), value);
    true
}

fn container<'a>(doc: &'a Document, segments: &[String]) -> Option<&'a Document> {
    let mut current = doc;
    for segment in segments {
        current = current.get(segment)?.as_object()?;
    }
    Some(current)
}

fn container_mut<'a>(doc: &'a mut Document, segments: &[String]) -> Option<&'a mut Document> {
    let mut current = doc;
    for segment in segments {
        current = current.get_mut(segment)?.as_object_mut()?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn path(p: &str) -> FieldPath {
        FieldPath::new(p).unwrap()
    }

    #[test]
    fn test_get_nested_value() {
        let d = doc(json!({"log": {"file": {"path": "/var/log/auth.log"}}}));
        assert_eq!(
            get_at(&d, &path("log.file.path")),
            Some(&json!("/var/log/auth.log"))
        );
        assert!(exists_at(&d, &path("log.file")));
    }

    #[test]
    fn test_get_missing_intermediate() {
        let d = doc(json!({"log": {}}));
        assert_eq!(get_at(&d, &path("log.file.path")), None);
        assert!(!exists_at(&d, &path("nothing.here")));
    }

    #[test]
    fn test_get_through_non_object_is_absent() {
        let d = doc(json!({"source": "10.0.0.1", "related": {"ip": ["1.1.1.1"]}}));
        assert_eq!(get_at(&d, &path("source.ip")), None);
        assert_eq!(get_at(&d, &path("related.ip.0")), None);
    }

    #[test]
    fn test_null_counts_as_present() {
        let d = doc(json!({"user": {"name": null}}));
        assert!(exists_at(&d, &path("user.name")));
        assert_eq!(get_at(&d, &path("user.name")), Some(&Value::Null));
    }

    #[test]
    fn test_get_at_mut_replaces_value() {
        let mut d = doc(json!({"source": {"ip": "10.0.0.1", "port": 22}}));
        *get_at_mut(&mut d, &path("source.ip")).unwrap() = json!("masked");
        assert_eq!(d, doc(json!({"source": {"ip": "masked", "port": 22}})));
    }

    #[test]
    fn test_delete_leaf_keeps_non_empty_parent() {
        let mut d = doc(json!({"user": {"name": "alice", "id": 42}}));
        assert!(delete_at(&mut d, &path("user.name")));
        assert_eq!(d, doc(json!({"user": {"id": 42}})));
    }

    #[test]
    fn test_delete_keeps_sibling_order() {
        let mut d: Document =
            serde_json::from_str(r#"{"z":1,"user":{"c":3,"name":"alice","a":1},"b":2}"#).unwrap();
        assert!(delete_at(&mut d, &path("user.name")));
        assert!(delete_at(&mut d, &path("z")));
        assert_eq!(
            serde_json::to_string(&d).unwrap(),
            r#"{"user":{"c":3,"a":1},"b":2}"#
        );
    }

    #[test]
    fn test_delete_prunes_empty_parents() {
        let mut d = doc(json!({"a": {"b": {"c": 1}}, "keep": true}));
        assert!(delete_at(&mut d, &path("a.b.c")));
        assert_eq!(d, doc(json!({"keep": true})));
    }

    #[test]
    fn test_delete_prunes_only_up_to_first_non_empty() {
        let mut d = doc(json!({"a": {"b": {"c": 1}, "sibling": 2}}));
        assert!(delete_at(&mut d, &path("a.b.c")));
        assert_eq!(d, doc(json!({"a": {"sibling": 2}})));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut d = doc(json!({"a": {"other": 1}, "empty": {}}));
        let before = d.clone();
        assert!(!delete_at(&mut d, &path("a.b.c")));
        assert!(!delete_at(&mut d, &path("empty.x")));
        assert_eq!(d, before);
    }

    #[test]
    fn test_delete_whole_subtree() {
        let mut d = doc(json!({"user": {"name": "alice"}, "x": 1}));
        assert!(delete_at(&mut d, &path("user")));
        assert_eq!(d, doc(json!({"x": 1})));
    }

    #[test]
    fn test_insert_creates_intermediates() {
        let mut d = Document::new();
        assert!(insert_at(&mut d, &path("log.file.path"), json!("/tmp/x")));
        assert_eq!(d, doc(json!({"log": {"file": {"path": "/tmp/x"}}})));
    }

    #[test]
    fn test_insert_into_existing_object() {
        let mut d = doc(json!({"source": {"ip": "1.2.3.4"}}));
        assert!(insert_at(&mut d, &path("source.port"), json!(22)));
        assert_eq!(d, doc(json!({"source": {"ip": "1.2.3.4", "port": 22}})));
    }

    #[test]
    fn test_insert_through_scalar_is_noop() {
        let mut d = doc(json!({"random": "/some/path"}));
        let before = d.clone();
        assert!(!insert_at(&mut d, &path("random.nest"), json!("x")));
        assert_eq!(d, before);
    }
}
