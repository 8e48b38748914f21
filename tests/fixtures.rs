use gitpatch::{ChangeKind, ChangeType, Patch, PatchFormatter};
use rayon::prelude::*;
use snapbox::{IntoData, assert_data_eq};

const ADDITION: &str = r#"diff --git a/src/batch.ts b/src/batch.ts
new file mode 100644
index 0000000..e9c0588
--- /dev/null
+++ b/src/batch.ts
@@ -0,0 +1,4 @@
+export function batch() {
+  flush();
+}
+
"#;

const DELETION: &str = r#"diff --git a/TODO.md b/TODO.md
deleted file mode 100644
index 7c6ded3..0000000
--- a/TODO.md
+++ /dev/null
@@ -1,3 +0,0 @@
-# TODO
-
-- [ ] write docs
"#;

const RENAME_WITH_EDIT: &str = r#"diff --git a/package.json b/packages.json
similarity index 84%
rename from package.json
rename to packages.json
index 4485ec5..d2ae972 100644
--- a/package.json
+++ b/packages.json
@@ -1,5 +1,5 @@
 {
-  "name": "zue",
+  "name": "zue-packages",
   "version": "0.1.0",
   "private": true
 }
"#;

const MODE_CHANGE: &str = r#"diff --git a/scripts/run.sh b/scripts/run.sh
old mode 100644
new mode 100755
"#;

const BINARY: &str = r#"diff --git a/logo.png b/logo.png
index 9ac1296..bc6bf6c 100644
Binary files a/logo.png and b/logo.png differ
"#;

const MULTI_HUNK: &str = r#"diff --git a/src/app.py b/src/app.py
index 8f0883f..3cf79dc 100644
--- a/src/app.py
+++ b/src/app.py
@@ -10,7 +10,7 @@ def create_app():
     app = App()
     app.load_config()
-    app.debug = True
+    app.debug = False
     app.register_routes()
     app.connect_db()
     app.listen()
     return app
@@ -31,6 +31,7 @@ def shutdown(app):
     app.close_db()
     app.flush_logs()
     app.stop()
+    log.info("bye")
     unregister(app)
     signal.reset()
     atexit.clear()
"#;

const NO_NEWLINE_LAST_LINE_EDIT: &str = r#"diff --git a/VERSION b/VERSION
index 2003b63..9325c3f 100644
--- a/VERSION
+++ b/VERSION
@@ -1 +1 @@
-0.9.1
\ No newline at end of file
+0.9.2
\ No newline at end of file
"#;

const NEWLINE_ADDED_AT_EOF: &str = r#"diff --git a/notes.txt b/notes.txt
index 01e79c3..8b13789 100644
--- a/notes.txt
+++ b/notes.txt
@@ -1 +1 @@
-last line
\ No newline at end of file
+last line
"#;

const INSERT_BEFORE_UNTERMINATED_EOF: &str = r#"diff --git a/ROADMAP b/ROADMAP
index 03f9a01..82d3761 100644
--- a/ROADMAP
+++ b/ROADMAP
@@ -1,2 +1,3 @@
 v1: parse
+v2: render
 v3: apply
\ No newline at end of file
"#;

const ALL: &[&str] = &[
    ADDITION,
    DELETION,
    RENAME_WITH_EDIT,
    MODE_CHANGE,
    BINARY,
    MULTI_HUNK,
    NO_NEWLINE_LAST_LINE_EDIT,
    NEWLINE_ADDED_AT_EOF,
    INSERT_BEFORE_UNTERMINATED_EOF,
];

#[test]
fn addition_patch() {
    let patch = Patch::from_str(ADDITION).unwrap();
    let header = patch.header();
    assert_eq!(header.change_type(), ChangeType::Addition);
    assert_eq!(header.from_path(), None);
    assert_eq!(header.to_path(), Some("src/batch.ts"));
    assert_eq!(header.from_revision(), "0000000");
    assert_eq!(header.to_revision(), "e9c0588");
    assert_eq!(header.from_mode(), None);
    assert_eq!(header.to_mode(), Some(100644));

    let hunk = &patch.hunks()[0];
    assert!(hunk.from_lines().is_empty());
    assert_eq!(hunk.to_lines().len(), 4);
    assert_eq!(hunk.to_lines()[0].kind(), ChangeKind::Added);
    assert_eq!(hunk.to_lines()[0].content(), "export function batch() {");
    assert_eq!(hunk.to_lines()[0].line_number(), 1);
    assert_eq!(hunk.to_lines()[3].content(), "");
}

#[test]
fn deletion_patch() {
    let patch = Patch::from_str(DELETION).unwrap();
    let header = patch.header();
    assert_eq!(header.change_type(), ChangeType::Deletion);
    assert_eq!(header.from_path(), Some("TODO.md"));
    assert_eq!(header.to_path(), None);
    assert_eq!(header.from_mode(), Some(100644));
    assert_eq!(header.to_mode(), None);
    assert_eq!(header.to_revision(), "0000000");

    let hunk = &patch.hunks()[0];
    assert!(hunk.to_lines().is_empty());
    assert_eq!(hunk.from_lines().len(), 3);
    assert_eq!(hunk.from_lines()[2].kind(), ChangeKind::Deleted);
    assert_eq!(hunk.from_lines()[2].content(), "- [ ] write docs");
    assert_eq!(hunk.from_lines()[2].line_number(), 3);
}

#[test]
fn rename_patch() {
    let patch = Patch::from_str(RENAME_WITH_EDIT).unwrap();
    let header = patch.header();
    assert_eq!(header.change_type(), ChangeType::Renaming);
    assert_eq!(header.similarity(), Some(84));
    assert_eq!(header.from_path(), Some("package.json"));
    assert_eq!(header.to_path(), Some("packages.json"));
    assert_eq!(header.from_mode(), Some(100644));
    assert_eq!(header.to_mode(), Some(100644));

    let hunk = &patch.hunks()[0];
    assert_eq!(hunk.from_lines().len(), 5);
    assert_eq!(hunk.to_lines().len(), 5);
    assert_eq!(hunk.to_lines()[1].content(), r#"  "name": "zue-packages","#);
}

#[test]
fn mode_change_patch() {
    let patch = Patch::from_str(MODE_CHANGE).unwrap();
    let header = patch.header();
    assert_eq!(header.change_type(), ChangeType::Modification);
    assert_eq!(header.from_path(), Some("scripts/run.sh"));
    assert_eq!(header.to_path(), Some("scripts/run.sh"));
    assert_eq!(header.from_mode(), Some(100644));
    assert_eq!(header.to_mode(), Some(100755));
    assert!(patch.hunks().is_empty());
}

#[test]
fn binary_patch() {
    let patch = Patch::from_str(BINARY).unwrap();
    assert!(patch.header().is_binary());
    assert_eq!(patch.header().from_revision(), "9ac1296");
    assert_eq!(patch.header().to_revision(), "bc6bf6c");
    assert!(patch.hunks().is_empty());
}

#[test]
fn multi_hunk_line_numbers_are_seeded_per_hunk() {
    let patch = Patch::from_str(MULTI_HUNK).unwrap();
    assert_eq!(patch.hunks().len(), 2);

    let second = &patch.hunks()[1];
    assert_eq!(second.header().function_context(), "def shutdown(app):");
    assert_eq!(second.from_lines()[0].line_number(), 31);
    assert_eq!(second.to_lines().last().unwrap().line_number(), 37);

    let added: Vec<_> = second
        .to_lines()
        .iter()
        .filter(|c| c.kind() == ChangeKind::Added)
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].content(), r#"    log.info("bye")"#);
    assert_eq!(added[0].line_number(), 34);
}

#[test]
fn no_newline_markers_attach_to_their_sides() {
    let both = Patch::from_str(NO_NEWLINE_LAST_LINE_EDIT).unwrap();
    assert!(both.from_no_newline());
    assert!(both.to_no_newline());

    let gained = Patch::from_str(NEWLINE_ADDED_AT_EOF).unwrap();
    assert!(gained.from_no_newline());
    assert!(!gained.to_no_newline());
}

#[test]
fn no_newline_marker_renders_only_after_the_final_line() {
    let patch = Patch::from_str(INSERT_BEFORE_UNTERMINATED_EOF).unwrap();
    assert!(patch.from_no_newline());
    assert!(patch.to_no_newline());

    let rendered = patch.to_string();
    assert_eq!(rendered.matches("\\ No newline").count(), 1);
    assert_data_eq!(rendered, INSERT_BEFORE_UNTERMINATED_EOF.raw());
}

#[test]
fn hunk_lines_match_declared_counts() {
    for fixture in ALL {
        let patch = Patch::from_str(fixture).unwrap();
        for hunk in patch.hunks() {
            assert_eq!(hunk.from_lines().len(), hunk.header().from_range().len());
            assert_eq!(hunk.to_lines().len(), hunk.header().to_range().len());
        }
    }
}

#[test]
fn rendering_reproduces_the_input() {
    for fixture in ALL {
        let patch = Patch::from_str(fixture).unwrap();
        assert_data_eq!(patch.to_string(), (*fixture).raw());
    }
}

#[test]
fn reparsing_rendered_output_is_identity() {
    for fixture in ALL {
        let patch = Patch::from_str(fixture).unwrap();
        let rendered = patch.to_string();
        let reparsed = Patch::from_str(&rendered).unwrap();
        assert_eq!(reparsed, patch);
    }
}

#[test]
fn formatter_matches_display() {
    let patch = Patch::from_str(MULTI_HUNK).unwrap();
    let formatter = PatchFormatter::new();
    assert_eq!(formatter.fmt_patch(&patch).to_string(), patch.to_string());
}

#[test]
fn parallel_parsing_is_deterministic() {
    let sequential: Vec<_> = ALL.iter().map(|s| Patch::from_str(s).unwrap()).collect();
    let parallel: Vec<_> = ALL.par_iter().map(|s| Patch::from_str(s).unwrap()).collect();
    assert_eq!(sequential, parallel);

    let copies = vec![MULTI_HUNK; 64];
    let parsed: Vec<_> = copies
        .par_iter()
        .map(|s| Patch::from_str(s).unwrap())
        .collect();
    assert!(parsed.windows(2).all(|w| w[0] == w[1]));
}
