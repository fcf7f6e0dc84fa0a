//! End-to-end publishing against an in-memory forum.

mod common;

use common::{memory_index, topic, Call, Forum, TestVault};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::time::Duration;
use vaultcast::{
    sync_files, AlwaysContinue, CategoryPlan, PublishAction, Publisher, SyncError, Vault,
};

mod scenarios {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_note_creates_one_topic() {
        let vault = TestVault::new();
        let path = vault.write("Intro.md", "Welcome to the vault.");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();

        let report = Publisher::new(&forum, &index, &settings)
            .publish(&path, None)
            .unwrap();

        assert_eq!(report.action, PublishAction::Created);
        assert_eq!(
            forum.calls(),
            vec![Call::Create {
                title: "Intro".to_string(),
                raw: "Welcome to the vault.".to_string(),
                category: 1,
            }]
        );
        let record = index.lookup("Intro").unwrap().unwrap();
        assert_eq!(record.remote_url, Some(topic("intro", 1)));
        assert_eq!(record.remote_post_id, Some(100));
        assert_eq!(index.len().unwrap(), 1);
    }

    #[test]
    fn republish_updates_stored_post() {
        let vault = TestVault::new();
        let path = vault.write("Intro.md", "First draft.");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);

        publisher.publish(&path, None).unwrap();
        let before = index.lookup("Intro").unwrap().unwrap();

        std::thread::sleep(Duration::from_millis(5));
        vault.write("Intro.md", "Second draft.");
        let report = publisher.publish(&path, None).unwrap();

        assert_eq!(report.action, PublishAction::Updated);
        assert_eq!(forum.created(), vec!["Intro"]);
        assert_eq!(
            forum.calls().last(),
            Some(&Call::Update {
                post_id: 100,
                raw: "Second draft.".to_string(),
            })
        );
        let after = index.lookup("Intro").unwrap().unwrap();
        assert_eq!(after.remote_url, before.remote_url);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn unknown_link_target_gets_placeholder() {
        let vault = TestVault::new();
        let path = vault.write("Start.md", "See [[Other Note]]");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();

        Publisher::new(&forum, &index, &settings)
            .publish(&path, None)
            .unwrap();

        assert_eq!(
            forum.calls()[0],
            Call::Create {
                title: "Other Note".to_string(),
                raw: "This is a placeholder topic for Other Note".to_string(),
                category: 1,
            }
        );
        let placeholder = index.lookup("Other Note").unwrap().unwrap();
        assert_eq!(placeholder.remote_url, Some(topic("other-note", 1)));
        assert_eq!(
            forum.calls()[1],
            Call::Create {
                title: "Start".to_string(),
                raw: format!("See [Other Note]({})", topic("other-note", 1)),
                category: 1,
            }
        );
    }

    #[test]
    fn rejected_upload_keeps_embed() {
        let vault = TestVault::new();
        vault.write("missing.png", b"\x89PNG");
        let path = vault.write("Gallery.md", "![[missing.png]]");
        let mut forum = Forum::new();
        forum.reject_uploads.insert("missing.png".to_string());
        let index = memory_index();
        let settings = vault.settings();

        let report = Publisher::new(&forum, &index, &settings)
            .publish(&path, None)
            .unwrap();

        assert_eq!(report.images_uploaded, 0);
        assert_eq!(report.tag_failures.len(), 1);
        assert_eq!(
            forum.calls().last(),
            Some(&Call::Create {
                title: "Gallery".to_string(),
                raw: "![[missing.png]]".to_string(),
                category: 1,
            })
        );
        let titles: Vec<_> = index.records().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Gallery"]);
    }

    #[test]
    fn walk_skips_invalid_file_kind() {
        let vault = TestVault::new();
        let one = vault.write("one.md", "1");
        let two = vault.write("two.txt", "2");
        let three = vault.write("three.md", "3");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);

        let mut prompt = |_: &Path, _: &SyncError| -> bool { panic!("local errors must not prompt") };
        let summary = sync_files(
            &publisher,
            vec![(one, None), (two, None), (three, None)],
            &mut prompt,
        );

        assert_eq!(summary.published.len(), 2);
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].error.contains("Invalid file kind"));
        assert!(!summary.aborted);
        assert!(index.lookup("one").unwrap().is_some());
        assert!(index.lookup("three").unwrap().is_some());
        assert_eq!(forum.created(), vec!["one", "three"]);
    }
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn resync_is_idempotent() {
        let vault = TestVault::new();
        vault.write("A.md", "Links to [[B]] and [[C]]");
        vault.write("B.md", "B");
        vault.write("notes/C.md", "Back to [[A]]");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);
        let walker = Vault::new(vault.root(), "md").unwrap();

        walker
            .sync(&publisher, &CategoryPlan::default(), &mut AlwaysContinue)
            .unwrap();
        let first = index.records().unwrap();
        let created = forum.created().len();

        walker
            .sync(&publisher, &CategoryPlan::default(), &mut AlwaysContinue)
            .unwrap();
        let second = index.records().unwrap();

        assert_eq!(forum.created().len(), created);
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 3);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.remote_url, b.remote_url);
            assert_eq!(a.remote_post_id, b.remote_post_id);
        }
    }

    #[test]
    fn shared_target_gets_one_placeholder() {
        let vault = TestVault::new();
        let a = vault.write("A.md", "[[Shared]]");
        let c = vault.write("C.md", "also [[Shared]]");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();

        sync_files(
            &Publisher::new(&forum, &index, &settings),
            vec![(a, None), (c, None)],
            &mut AlwaysContinue,
        );

        assert_eq!(forum.created(), vec!["Shared", "A", "C"]);
    }

    #[test]
    fn images_are_migrated_before_links() {
        let vault = TestVault::new();
        vault.write("Linked Note.png", b"png");
        let path = vault.write("Doc.md", "![[Linked Note.png]] then [[Linked Note]]");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();

        Publisher::new(&forum, &index, &settings)
            .publish(&path, None)
            .unwrap();

        assert_eq!(forum.created(), vec!["Linked Note", "Doc"]);
        assert_eq!(
            forum.calls().last(),
            Some(&Call::Create {
                title: "Doc".to_string(),
                raw: format!(
                    "![Linked Note.png](upload://asset1.png) then [Linked Note]({})",
                    topic("linked-note", 2)
                ),
                category: 1,
            })
        );
    }

    #[test]
    fn create_or_update_never_both() {
        let vault = TestVault::new();
        let fresh = vault.write("Fresh.md", "new");
        let known = vault.write("Known.md", "old");
        let forum = Forum::new();
        let index = memory_index();
        index
            .create_or_update("Known", Some(&topic("known", 9)), Some(900), false)
            .unwrap();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);

        publisher.publish(&fresh, None).unwrap();
        publisher.publish(&known, None).unwrap();

        assert_eq!(forum.created(), vec!["Fresh"]);
        assert_eq!(forum.updates(), vec![900]);
    }
}

mod failures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unauthenticated_prompts_and_abort_keeps_progress() {
        let vault = TestVault::new();
        let first = vault.write("First.md", "ok");
        let second = vault.write("Second.md", "blocked");
        let third = vault.write("Third.md", "never tried");
        let forum = Forum::new();
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);

        let summary = sync_files(&publisher, vec![(first, None)], &mut AlwaysContinue);
        assert!(summary.is_clean());

        let mut locked = Forum::new();
        locked.unauthenticated = true;
        let publisher = Publisher::new(&locked, &index, &settings);
        let mut asked = Vec::new();
        let mut prompt = |path: &Path, error: &SyncError| {
            asked.push((path.to_path_buf(), error.is_unauthenticated()));
            false
        };
        let summary = sync_files(
            &publisher,
            vec![(second.clone(), None), (third, None)],
            &mut prompt,
        );

        assert!(summary.aborted);
        assert_eq!(asked, vec![(second, true)]);
        assert_eq!(locked.created(), vec!["Second"]);
        assert!(index.lookup("First").unwrap().is_some());
        assert!(index.lookup("Second").unwrap().is_none());
    }

    #[test]
    fn accepting_prompt_continues() {
        let vault = TestVault::new();
        let taken = vault.write("Taken.md", "dup");
        let fine = vault.write("Fine.md", "ok");
        let mut forum = Forum::new();
        forum.reject_topics.insert("Taken".to_string());
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);

        let mut prompts = 0;
        let mut prompt = |_: &Path, _: &SyncError| {
            prompts += 1;
            true
        };
        let summary = sync_files(&publisher, vec![(taken, None), (fine, None)], &mut prompt);

        assert_eq!(prompts, 1);
        assert!(!summary.aborted);
        assert_eq!(summary.published.len(), 1);
        assert_eq!(summary.published[0].title, "Fine");
    }

    #[test]
    fn categories_follow_directories() {
        let vault = TestVault::new();
        vault.write("top.md", "t");
        vault.write("rust/deep/inner.md", "i");
        let mut forum = Forum::new();
        forum.categories = vec![vaultcast::remote::SiteCategory {
            id: 12,
            name: "Rust".to_string(),
            slug: "rust".to_string(),
            read_restricted: false,
            parent_category_id: None,
        }];
        let index = memory_index();
        let settings = vault.settings();
        let publisher = Publisher::new(&forum, &index, &settings);
        let config = vaultcast::Config::from_toml_str("[categories]\nrust = \"Rust\"\n").unwrap();

        let plan = CategoryPlan::fetch(&config, &forum).unwrap();
        Vault::new(vault.root(), "md")
            .unwrap()
            .sync(&publisher, &plan, &mut AlwaysContinue)
            .unwrap();

        let categories: Vec<_> = forum
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create { title, category, .. } => Some((title, category)),
                _ => None,
            })
            .collect();
        assert_eq!(
            categories,
            vec![("top".to_string(), 1), ("inner".to_string(), 12)]
        );
    }
}
