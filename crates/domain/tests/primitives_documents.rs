//! Integration coverage for domain primitives and line documents.

use jgs_chroma_domain::{CollectionName, DocumentId, PrimitiveError, split_lines};
use jgs_chroma_shared::ErrorEnvelope;
use proptest::prelude::*;

#[test]
fn collection_name_errors_surface_metadata() -> Result<(), PrimitiveError> {
    let Err(error) = CollectionName::parse("bad..name") else {
        return Err(PrimitiveError::InvalidCollectionName {
            input: "bad..name".to_string(),
        });
    };

    let envelope: ErrorEnvelope = error.into();
    assert_eq!(envelope.code.namespace(), "domain");
    assert_eq!(envelope.code.code(), "invalid_collection_name");
    assert_eq!(
        envelope.metadata.get("input"),
        Some(&"bad..name".to_string())
    );

    Ok(())
}

#[test]
fn blank_document_id_reports_input_length() -> Result<(), PrimitiveError> {
    let Err(error) = DocumentId::parse("   ") else {
        return Err(PrimitiveError::InvalidDocumentId { input_length: 0 });
    };

    let envelope: ErrorEnvelope = error.into();
    assert_eq!(envelope.code.code(), "invalid_document_id");
    assert_eq!(
        envelope.metadata.get("input_length"),
        Some(&"3".to_string())
    );

    Ok(())
}

#[test]
fn identifiers_serialize_as_plain_strings() -> Result<(), Box<dyn std::error::Error>> {
    let name = CollectionName::parse("jgs_db")?;
    let id = DocumentId::parse("line-7")?;

    assert_eq!(serde_json::to_string(&name)?, "\"jgs_db\"");
    assert_eq!(serde_json::to_value(&id)?, serde_json::json!("line-7"));
    Ok(())
}

#[test]
fn classic_mac_and_unicode_separators_end_lines() {
    let texts: Vec<String> = split_lines("alpha\rbeta\u{2028}gamma\x0cdelta")
        .into_iter()
        .map(|line| line.text.into_string())
        .collect();
    assert_eq!(texts, vec!["alpha", "beta", "gamma", "delta"]);
}

proptest! {
    #[test]
    fn well_formed_names_always_parse(name in "[a-z][a-z0-9_-]{1,40}[a-z0-9]") {
        let parsed = CollectionName::parse(&name);
        prop_assert!(parsed.is_ok());
        let inner = parsed.map(CollectionName::into_inner).ok();
        prop_assert_eq!(inner.as_deref(), Some(name.as_str()));
    }

    #[test]
    fn line_indices_are_dense_and_ordered(lines in proptest::collection::vec("[^\r\n\x0b\x0c\x1c-\x1e\u{85}\u{2028}\u{2029}]{0,20}", 0..20)) {
        let contents: String = lines.iter().map(|line| format!("{line}\n")).collect();
        let documents = split_lines(&contents);
        prop_assert_eq!(documents.len(), lines.len());
        for (position, (document, line)) in documents.iter().zip(&lines).enumerate() {
            prop_assert_eq!(document.index, position);
            prop_assert_eq!(document.text.as_ref(), line.as_str());
        }
    }
}
