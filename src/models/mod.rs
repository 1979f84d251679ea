use serde::{Deserialize, Serialize};

/// Repository status served by the backend at `/api/git/info`.
///
/// Optional counters stay `None` when the backend omits them; rendering
/// treats `Some(0)` and `None` the same (no badge).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RepoStatus {
    pub current_branch: String,

    #[serde(default)]
    pub commits_ahead: Option<u32>,

    #[serde(default)]
    pub commits_behind: Option<u32>,

    #[serde(default)]
    pub other_branches: Vec<BranchStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct BranchStatus {
    pub branch: String,

    #[serde(default)]
    pub ahead: Option<u32>,

    #[serde(default)]
    pub behind: Option<u32>,
}

/// One reorderable entry as seen by the server: stable path plus its 0-based
/// position after the drop. `index` is recomputed from DOM order on every
/// emission and never persisted in between.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct DragItem {
    pub path: String,
    pub index: usize,
}

/// Payload of the outbound `reorder` event.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReorderPayload {
    pub items: Vec<DragItem>,
    pub project: String,
}

/// A startup file entry rendered into the sortable list. The server inlines
/// these into the page; see `app::read_bootstrap`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct StartupEntry {
    pub path: String,

    #[serde(default)]
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_status_full_deserialize() {
        let json = r#"{
            "current_branch": "main",
            "commits_ahead": 3,
            "commits_behind": 1,
            "other_branches": [
                {"branch": "develop", "ahead": 2},
                {"branch": "release", "behind": 4}
            ]
        }"#;
        let parsed: RepoStatus = serde_json::from_str(json).expect("status should parse");
        assert_eq!(parsed.current_branch, "main");
        assert_eq!(parsed.commits_ahead, Some(3));
        assert_eq!(parsed.commits_behind, Some(1));
        assert_eq!(parsed.other_branches.len(), 2);
        assert_eq!(parsed.other_branches[0].ahead, Some(2));
        assert_eq!(parsed.other_branches[0].behind, None);
    }

    #[test]
    fn test_repo_status_minimal_deserialize() {
        // Backend may omit every optional field.
        let parsed: RepoStatus =
            serde_json::from_str(r#"{"current_branch": "main"}"#).expect("status should parse");
        assert_eq!(parsed.current_branch, "main");
        assert!(parsed.commits_ahead.is_none());
        assert!(parsed.commits_behind.is_none());
        assert!(parsed.other_branches.is_empty());
    }

    #[test]
    fn test_reorder_payload_serialize() {
        let payload = ReorderPayload {
            items: vec![
                DragItem {
                    path: "lib/a.ex".to_string(),
                    index: 0,
                },
                DragItem {
                    path: "lib/b.ex".to_string(),
                    index: 1,
                },
            ],
            project: "demo".to_string(),
        };
        let v = serde_json::to_value(payload).expect("should serialize");
        assert_eq!(v["project"], "demo");
        assert_eq!(v["items"][0]["path"], "lib/a.ex");
        assert_eq!(v["items"][1]["index"], 1);
    }
}
