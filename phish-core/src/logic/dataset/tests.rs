use super::export::{read_sample, CombinedWriter};
use super::loader::{load_labeled, load_urls};
use super::record::{DatasetRecord, LabeledUrl};
use crate::logic::features::{FeatureSlot, FeatureVector, FEATURE_COUNT};
use crate::logic::model::Label;
use crate::CoreError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_urls_drops_empty_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("phishing.csv");
    fs::write(&path, "id,url\n1,http://evil.example/login\n2,\n3,http://bit.ly/x\n").unwrap();

    let samples = load_urls(&path, Label::Phishing).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].url, "http://evil.example/login");
    assert!(samples.iter().all(|s| s.label == Label::Phishing));
}

#[test]
fn test_missing_url_column() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    fs::write(&path, "link\nhttp://a.com\n").unwrap();

    let result = load_urls(&path, Label::Legitimate);
    assert!(matches!(result, Err(CoreError::MissingColumn { .. })));
}

#[test]
fn test_load_labeled_concatenates() {
    let dir = tempdir().unwrap();
    let phishing = dir.path().join("phishing.csv");
    let legitimate = dir.path().join("legitimate.csv");
    fs::write(&phishing, "url\nhttp://1.2.3.4/a.exe\n").unwrap();
    fs::write(&legitimate, "url,rank\nhttps://example.com,1\nhttps://rust-lang.org,2\n").unwrap();

    let samples = load_labeled(&phishing, &legitimate).unwrap();
    assert_eq!(samples.len(), 3);
    assert_eq!(samples[0].label, Label::Phishing);
    assert_eq!(samples[2].label, Label::Legitimate);
}

#[test]
fn test_load_labeled_empty_is_error() {
    let dir = tempdir().unwrap();
    let phishing = dir.path().join("phishing.csv");
    let legitimate = dir.path().join("legitimate.csv");
    fs::write(&phishing, "url\n").unwrap();
    fs::write(&legitimate, "url\n").unwrap();

    assert!(matches!(load_labeled(&phishing, &legitimate), Err(CoreError::EmptyDataset)));
}

#[test]
fn test_export_then_read_sample() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("combined.csv");

    let sample = LabeledUrl {
        url: "http://a.com/x,y".to_string(),
        label: Label::Phishing,
    };
    let mut features = FeatureVector::new();
    features.set(FeatureSlot::Length, 16.0);
    features.set(FeatureSlot::Text31, 0.5);

    let mut writer = CombinedWriter::create(&path).unwrap();
    writer.append(&DatasetRecord::new(&sample, &features)).unwrap();
    assert_eq!(writer.finish().unwrap(), 1);

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("url,type,label,feature_0,feature_1"));
    assert!(lines.next().unwrap().starts_with("\"http://a.com/x,y\",phishing,1,16,"));

    let map = read_sample(&path).unwrap().unwrap();
    assert_eq!(map.len(), FEATURE_COUNT);
    assert_eq!(map["feature_0"], 16.0);
    assert_eq!(map["feature_46"], 0.5);
}

#[test]
fn test_read_sample_without_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("combined.csv");
    let writer = CombinedWriter::create(&path).unwrap();
    writer.finish().unwrap();

    assert!(read_sample(&path).unwrap().is_none());
}
