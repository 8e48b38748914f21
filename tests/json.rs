#![cfg(feature = "serde")]

use gitpatch::Patch;
use serde_json::json;

#[test]
fn patch_serializes_to_interchange_shape() {
    let patch = Patch::from_str(
        "diff --git a/greeting.txt b/greeting.txt\n\
         new file mode 100644\n\
         index 0000000..af5626b\n\
         --- /dev/null\n\
         +++ b/greeting.txt\n\
         @@ -0,0 +1 @@\n\
         +hello\n\
         \\ No newline at end of file\n",
    )
    .unwrap();

    let value = serde_json::to_value(&patch).unwrap();
    assert_eq!(
        value,
        json!({
            "header": {
                "raw": "diff --git a/greeting.txt b/greeting.txt\nnew file mode 100644\nindex 0000000..af5626b\n--- /dev/null\n+++ b/greeting.txt",
                "fromPath": null,
                "toPath": "greeting.txt",
                "fromRevision": "0000000",
                "toRevision": "af5626b",
                "changeType": "addition",
                "fromMode": null,
                "toMode": 100644,
                "similarity": null,
                "dissimilarity": null,
                "isBinary": false
            },
            "hunks": [
                {
                    "header": {
                        "raw": "@@ -0,0 +1 @@",
                        "fromRange": { "start": 0, "len": 0 },
                        "toRange": { "start": 1, "len": 1 },
                        "functionContext": ""
                    },
                    "fromLines": [],
                    "toLines": [
                        { "kind": "added", "content": "hello", "lineNumber": 1 }
                    ]
                }
            ],
            "fromNoNewline": false,
            "toNoNewline": true
        })
    );
}

#[test]
fn change_types_serialize_lowercase() {
    let patch = Patch::from_str("diff --git a/f b/f\ndeleted file mode 100644").unwrap();
    let value = serde_json::to_value(&patch).unwrap();
    assert_eq!(value["header"]["changeType"], json!("deletion"));
    assert_eq!(value["header"]["toPath"], json!(null));
}

#[test]
fn change_kinds_serialize_lowercase() {
    let patch = Patch::from_str("diff --git a/f b/f\n@@ -1,2 +1,2 @@\n a\n-b\n+c\n").unwrap();
    let value = serde_json::to_value(&patch).unwrap();

    let from = &value["hunks"][0]["fromLines"];
    assert_eq!(from[0]["kind"], json!("common"));
    assert_eq!(from[1]["kind"], json!("deleted"));
    assert_eq!(value["hunks"][0]["toLines"][1]["kind"], json!("added"));
}
