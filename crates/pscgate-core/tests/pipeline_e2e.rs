//! End-to-end pipeline tests against the in-memory store.

use std::io::{Cursor, Write};

use bytes::Bytes;
use object_store::path::Path;
use zip::write::SimpleFileOptions;

use pscgate_core::{
    process, ArchiveRef, BlobStore, GateConfig, ObjectStoreBlobStore, RunStatus,
};

fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut zw = zip::ZipWriter::new(&mut buf);
        for (name, data) in files {
            zw.start_file(*name, SimpleFileOptions::default()).unwrap();
            zw.write_all(data).unwrap();
        }
        zw.finish().unwrap();
    }
    buf.into_inner()
}

fn config() -> GateConfig {
    GateConfig {
        source_root: "invoicingfiles".to_string(),
        dest_root: "outbound".to_string(),
    }
}

async fn seed(store: &ObjectStoreBlobStore, trigger: &str, bytes: Vec<u8>) -> ArchiveRef {
    let archive = ArchiveRef::parse(trigger).unwrap();
    let key = archive.source_key("invoicingfiles");
    store.put(&key, Bytes::from(bytes)).await.unwrap();
    archive
}

#[tokio::test]
async fn valid_archive_is_promoted_and_source_deleted() {
    let store = ObjectStoreBlobStore::memory();
    let zip = build_zip(&[
        ("data.csv", b"1,2,3\n"),
        ("manifest.txt", b"JobNo\tJobDate\nrow1\tREVPAY-RECS-OH\n"),
    ]);
    let archive = seed(&store, "2026/08/PSC/PSC_Batch 01.zip", zip).await;

    let report = process(&store, &config(), &archive).await;

    let RunStatus::Promoted { uploaded } = &report.status else {
        panic!("expected promotion, got {:?}", report.status);
    };
    assert_eq!(uploaded.len(), 2);
    assert!(report.source_deleted);

    // Data entry uploaded raw under its sanitized name.
    let data = store
        .get(&Path::from("outbound/2026/08/PSC/valid/data-csv"))
        .await
        .unwrap();
    assert_eq!(&data[..], b"1,2,3\n");

    // Manifest uploaded rewritten; the header line was consumed by
    // validation and is not part of the promoted object.
    let manifest = store
        .get(&Path::from("outbound/2026/08/PSC/valid/manifest-txt"))
        .await
        .unwrap();
    assert_eq!(&manifest[..], b"row1\tPESTMTS\n");

    // Source gone.
    let source = store
        .get(&Path::from("invoicingfiles/2026/08/PSC/PSC_Batch 01.zip"))
        .await;
    assert!(source.is_err());
}

#[tokio::test]
async fn single_entry_archive_is_rejected_but_source_still_deleted() {
    let store = ObjectStoreBlobStore::memory();
    let zip = build_zip(&[("manifest.txt", b"JobNo\tJobDate\n")]);
    let archive = seed(&store, "2026/08/PSC/lonely.zip", zip.clone()).await;

    let report = process(&store, &config(), &archive).await;

    let RunStatus::Rejected {
        rejection,
        routed_to,
    } = &report.status
    else {
        panic!("expected rejection, got {:?}", report.status);
    };
    assert_eq!(format!("{rejection}"), "expected 2 entries, found 1");
    assert!(report.source_deleted);

    // Nothing under valid/.
    let valid = store
        .list(&Path::from("outbound/2026/08/PSC/valid"))
        .await
        .unwrap();
    assert!(valid.is_empty());

    // Original archive routed to Invalid/ verbatim.
    let routed_key = routed_to.as_deref().expect("invalid routing should succeed");
    assert_eq!(routed_key, "outbound/2026/08/PSC/Invalid/lonely.zip");
    let routed = store.get(&Path::from(routed_key)).await.unwrap();
    assert_eq!(&routed[..], &zip[..]);

    let source = store
        .get(&Path::from("invoicingfiles/2026/08/PSC/lonely.zip"))
        .await;
    assert!(source.is_err());
}

#[tokio::test]
async fn bad_headers_reject_the_whole_archive_with_no_valid_uploads() {
    let store = ObjectStoreBlobStore::memory();
    let zip = build_zip(&[("data.csv", b"1,2\n"), ("manifest.txt", b"Foo\tBar\nrow\n")]);
    let archive = seed(&store, "2026/08/PSC/badheaders.zip", zip).await;

    let report = process(&store, &config(), &archive).await;

    assert!(matches!(
        report.status,
        RunStatus::Rejected {
            rejection: pscgate_core::Rejection::InvalidHeaders { .. },
            ..
        }
    ));
    assert!(report.source_deleted);

    // The data entry must not have been uploaded before the manifest check.
    let valid = store
        .list(&Path::from("outbound/2026/08/PSC/valid"))
        .await
        .unwrap();
    assert!(valid.is_empty());
}

#[tokio::test]
async fn empty_manifest_first_line_rejects_with_zero_valid_uploads() {
    let store = ObjectStoreBlobStore::memory();
    let zip = build_zip(&[("data.csv", b"1\n"), ("manifest.txt", b"\nJobNo\n")]);
    let archive = seed(&store, "2026/08/PSC/empty.zip", zip).await;

    let report = process(&store, &config(), &archive).await;

    assert!(matches!(
        report.status,
        RunStatus::Rejected {
            rejection: pscgate_core::Rejection::EmptyManifest { .. },
            ..
        }
    ));
    let valid = store
        .list(&Path::from("outbound/2026/08/PSC/valid"))
        .await
        .unwrap();
    assert!(valid.is_empty());
}

#[tokio::test]
async fn corrupt_archive_aborts_without_deleting_the_source() {
    let store = ObjectStoreBlobStore::memory();
    let archive = seed(&store, "2026/08/PSC/corrupt.zip", b"definitely not a zip".to_vec()).await;

    let report = process(&store, &config(), &archive).await;

    assert!(matches!(report.status, RunStatus::Aborted { .. }));
    assert!(!report.source_deleted);

    // Source left in place for operator inspection.
    let source = store
        .get(&Path::from("invoicingfiles/2026/08/PSC/corrupt.zip"))
        .await;
    assert!(source.is_ok());
}

#[tokio::test]
async fn missing_source_aborts_without_uploads() {
    let store = ObjectStoreBlobStore::memory();
    let archive = ArchiveRef::parse("2026/08/PSC/ghost.zip").unwrap();

    let report = process(&store, &config(), &archive).await;

    assert!(matches!(report.status, RunStatus::Aborted { .. }));
    assert!(!report.source_deleted);
    let all = store.list(&Path::from("outbound")).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn report_serializes_for_the_cli() {
    let store = ObjectStoreBlobStore::memory();
    let zip = build_zip(&[
        ("data.csv", b"1\n"),
        ("manifest.txt", b"JobNo\nREVPAY-EDEL-AZ\n"),
    ]);
    let archive = seed(&store, "2026/08/PSC/json.zip", zip).await;

    let report = process(&store, &config(), &archive).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["archive"], "json");
    assert_eq!(json["status"]["status"], "promoted");
    assert_eq!(json["source_deleted"], true);
}
