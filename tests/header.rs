use accfetch::domain::Accession;
use accfetch::header::{HeaderOptions, sanitize_record};

fn acc(value: &str) -> Accession {
    value.parse().unwrap()
}

#[test]
fn default_mode_caps_description_at_fifty() {
    let raw = format!(">gi|99|gb|AB123456.1|{}\nATGC\n", "d".repeat(70));
    let record = sanitize_record(&raw, &acc("AB123456"), &HeaderOptions::default());
    let header = record.lines().next().unwrap();
    // ">" + accession + "_" + 50 description chars
    assert_eq!(header.len(), 1 + 8 + 1 + 50);
}

#[test]
fn desc_len_is_configurable() {
    let raw = format!(">gi|99|gb|AB123456.1|{}\nATGC\n", "d".repeat(70));
    let options = HeaderOptions {
        desc_len: 10,
        ..HeaderOptions::default()
    };
    let record = sanitize_record(&raw, &acc("AB123456"), &options);
    assert!(record.starts_with(&format!(">AB123456_{}", "d".repeat(10))));
    assert!(!record.lines().next().unwrap().contains(&"d".repeat(11)));
}

#[test]
fn whitespace_mode_uses_space_separator() {
    let raw = ">gi|99|gb|AB123456.1|Danio rerio actin\nATGC\n";
    let options = HeaderOptions {
        keep_whitespace: true,
        ..HeaderOptions::default()
    };
    let record = sanitize_record(raw, &acc("AB123456"), &options);
    assert!(record.starts_with(">AB123456 Danio rerio actin\n"));
}

#[test]
fn opaque_failure_text_still_produces_a_record() {
    // Entrez failures arrive as plain text in the body; the record degrades
    // to the accession plus whatever survives cleaning.
    let record = sanitize_record("Error occurred", &acc("AB123456"), &HeaderOptions::default());
    assert_eq!(record, ">AB123456_");
}
