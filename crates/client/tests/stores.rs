//! Files and sharing stores against a mock backend.

use std::cell::RefCell;
use std::rc::Rc;

use filehost_api_client::{FilePart, ShareLinkRequest, ShareLinkUpdate};
use filehost_client::{ClientContext, History, Navigator};
use filehost_config::{ClientConfig, MemoryStore};
use httpmock::prelude::*;
use serde_json::json;
use smol::LocalExecutor;

type Shown = Rc<RefCell<Vec<String>>>;

fn context(server: &MockServer) -> (Rc<LocalExecutor<'static>>, ClientContext, Shown) {
    let config = ClientConfig {
        api_base: format!("{}/api", server.base_url()),
        ..ClientConfig::default()
    };
    let navigator: Rc<dyn Navigator> = Rc::new(History::new());
    let executor = Rc::new(LocalExecutor::new());
    let ctx = ClientContext::new(
        config,
        Box::new(MemoryStore::with_token("T1")),
        navigator,
        executor.clone(),
    );
    let shown = Rc::new(RefCell::new(Vec::new()));
    let sink = shown.clone();
    ctx.notifier.on_display(move |m| sink.borrow_mut().push(m.text.clone()));
    (executor, ctx, shown)
}

fn file_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "fileId": id,
        "filename": name,
        "size": 12,
        "uploadedAt": "2025-06-15T14:30:00",
        "sharedLinksCount": 0
    })
}

#[test]
fn test_fetch_files_replaces_list() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/files").header("Authorization", "T1");
        then.status(200).json_body(json!({ "files": [file_json("f1", "a.txt"), file_json("f2", "b.pdf")] }));
    });

    let (executor, ctx, _) = context(&server);
    smol::block_on(executor.run(ctx.files.fetch_files()));

    let files = ctx.files.files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[1].filename, "b.pdf");
    assert!(!ctx.files.is_loading());
}

#[test]
fn test_failed_fetch_keeps_stale_list() {
    let server = MockServer::start();
    let mut ok = server.mock(|when, then| {
        when.method(GET).path("/api/files");
        then.status(200).json_body(json!({ "files": [file_json("f1", "a.txt")] }));
    });

    let (executor, ctx, shown) = context(&server);
    smol::block_on(executor.run(ctx.files.fetch_files()));
    assert_eq!(ctx.files.files().len(), 1);

    ok.delete();
    server.mock(|when, then| {
        when.method(GET).path("/api/files");
        then.status(503);
    });
    smol::block_on(executor.run(ctx.files.fetch_files()));

    assert_eq!(ctx.files.files().len(), 1);
    assert!(!ctx.files.is_loading());
    assert!(shown.borrow().is_empty());
}

#[test]
fn test_upload_notifies_then_refreshes() {
    let server = MockServer::start();
    let upload = server.mock(|when, then| {
        when.method(POST)
            .path("/api/files/upload")
            .header("Authorization", "T1");
        then.status(201);
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/files");
        then.status(200).json_body(json!({ "files": [file_json("f9", "notes.txt")] }));
    });

    let (executor, ctx, shown) = context(&server);
    let part = FilePart::file("notes.txt", "text/plain", b"hello".to_vec());
    smol::block_on(executor.run(ctx.files.upload_file(part))).unwrap();

    upload.assert();
    list.assert();
    assert_eq!(*shown.borrow(), vec!["File \"notes.txt\" uploaded successfully!"]);
    assert_eq!(ctx.files.files()[0].file_id, "f9");
}

#[test]
fn test_delete_failure_returned_without_refresh() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path("/api/files/f1");
        then.status(404)
            .json_body(json!({ "errorType": "FILE_NOT_FOUND", "errorMessage": "File not found" }));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/files");
        then.status(200).json_body(json!({ "files": [] }));
    });

    let (executor, ctx, shown) = context(&server);
    let err = smol::block_on(executor.run(ctx.files.delete_file("f1"))).unwrap_err();

    assert_eq!(err.as_api().map(|e| e.error_type.as_str()), Some("FILE_NOT_FOUND"));
    list.assert_hits(0);
    assert!(shown.borrow().is_empty());
}

#[test]
fn test_download_writes_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/files/f1");
        then.status(200).body("file contents");
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a.txt");
    let (executor, ctx, shown) = context(&server);

    let ok = smol::block_on(executor.run(ctx.files.download_file("f1", "a.txt", &dest)));

    assert!(ok);
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "file contents");
    assert_eq!(*shown.borrow(), vec!["File \"a.txt\" downloaded successfully!"]);
}

#[test]
fn test_download_failure_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/files/f1");
        then.status(403)
            .json_body(json!({ "errorType": "ACCESS_DENIED", "errorMessage": "Access denied" }));
    });

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a.txt");
    let (executor, ctx, shown) = context(&server);

    let ok = smol::block_on(executor.run(ctx.files.download_file("f1", "a.txt", &dest)));

    assert!(!ok);
    assert!(!dest.exists());
    assert_eq!(*shown.borrow(), vec!["Failed to download file. Please try again."]);
}

#[test]
fn test_share_link_lifecycle() {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/sharing")
            .json_body(json!({ "fileId": "f1", "password": "secret" }));
        then.status(201).json_body(json!({ "shareLinkId": "l1" }));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/sharing/l1")
            .json_body(json!({ "expiry": "2026-01-01T00:00:00" }));
        then.status(200).json_body(json!({ "shareLinkId": "l1" }));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/sharing/l1");
        then.status(204);
    });

    let (executor, ctx, shown) = context(&server);
    let request = ShareLinkRequest {
        file_id: "f1".into(),
        password: Some("secret".into()),
        expiry: None,
    };
    let update_body = ShareLinkUpdate { expiry: Some("2026-01-01T00:00:00".into()), ..Default::default() };

    // Hide between calls so each message is displayed at once.
    smol::block_on(executor.run(async {
        let link = ctx.sharing.create_share_link(&request).await.unwrap();
        assert_eq!(link.share_link_id, "l1");
        ctx.notifier.hide();
        ctx.sharing.update_share_link("l1", &update_body).await.unwrap();
        ctx.notifier.hide();
        ctx.sharing.delete_share_link("l1").await.unwrap();
    }));

    create.assert();
    update.assert();
    delete.assert();
    assert_eq!(
        *shown.borrow(),
        vec![
            "Share link created successfully!",
            "Share link updated successfully!",
            "Share link deleted successfully!",
        ]
    );
}

#[test]
fn test_validate_and_list_do_not_notify() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/sharing/l1/validate").query_param("password", "pw");
        then.status(200).json_body(json!({
            "linkId": "l1", "fileId": "f1", "filename": "a.pdf", "fileSize": 10,
            "hasPassword": true, "validPassword": true, "expiry": null, "hasExpired": false
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/files/f1/shareLinks");
        then.status(200).json_body(json!({
            "fileId": "f1",
            "links": [{ "shareLinkId": "l1", "expiry": null, "password": null }]
        }));
    });

    let (executor, ctx, shown) = context(&server);
    let validation = smol::block_on(executor.run(ctx.sharing.validate_shared_file("l1", Some("pw")))).unwrap();
    let links = smol::block_on(executor.run(ctx.sharing.get_share_links("f1"))).unwrap();

    assert!(validation.valid_password);
    assert_eq!(links.links.len(), 1);
    assert!(shown.borrow().is_empty());
}

#[test]
fn test_share_failure_not_notified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/sharing");
        then.status(400)
            .json_body(json!({ "errorType": "INVALID_EXPIRY", "errorMessage": "Expiry must be in the future" }));
    });

    let (executor, ctx, shown) = context(&server);
    let request = ShareLinkRequest { file_id: "f1".into(), password: None, expiry: Some("2000-01-01T00:00:00".into()) };
    let err = smol::block_on(executor.run(ctx.sharing.create_share_link(&request))).unwrap_err();

    assert_eq!(err.as_api().map(|e| e.error_message.as_str()), Some("Expiry must be in the future"));
    assert!(shown.borrow().is_empty());
}
