//! Round-trip and layering behavior across the encode-time and decode-time
//! vocabulary forms.

use fastinfoset_vocab::tables::Obtained;
use fastinfoset_vocab::vocab::{
    DecoderVocabulary, EncoderVocabulary, Name, Vocabulary, RESERVED_XML_INDEX, XML_NAMESPACE_NAME,
    XML_PREFIX,
};
use fastinfoset_vocab::{TableLimits, TokenCategory, VocabularyLimits};

use proptest::prelude::*;

/// Replay an encode-time session on a decode-time table and check that
/// every index resolves back to the value it was first assigned for.
fn assert_round_trip(values: &[String]) {
    let mut enc = EncoderVocabulary::new();
    let mut dec = DecoderVocabulary::new();

    let mut assigned: Vec<(String, u32)> = Vec::new();
    for value in values {
        if value.is_empty() {
            continue;
        }
        match enc.attribute_value.obtain_index(value.as_str()) {
            Obtained::Added(index) => {
                // The encoder emitted a literal flagged for table
                // addition; the decoder appends.
                assert_eq!(dec.attribute_value.add(value.clone()), index);
                assigned.push((value.clone(), index));
            }
            Obtained::Found(index) => {
                assert_eq!(dec.attribute_value.get(index).unwrap(), value);
            }
            Obtained::Rejected => unreachable!("unbounded table rejected a value"),
        }
    }

    for (value, index) in &assigned {
        assert_eq!(dec.attribute_value.get(*index).unwrap(), value);
    }
}

proptest! {
    #[test]
    fn prop_round_trip_index_stability(values in prop::collection::vec("[a-d]{0,3}", 0..64)) {
        assert_round_trip(&values);
    }
}

#[test]
fn round_trip_with_shared_layering() {
    let mut base_enc = EncoderVocabulary::new();
    let mut base_dec = DecoderVocabulary::new();
    for value in ["alpha", "beta"] {
        let index = base_enc
            .character_content_chunk
            .obtain_index(value)
            .index()
            .unwrap();
        assert_eq!(base_dec.character_content_chunk.add(value.to_string()), index);
    }
    let base_enc = base_enc.into_shared();
    let base_dec = base_dec.into_shared();

    let mut enc = EncoderVocabulary::new();
    let mut dec = DecoderVocabulary::new();
    enc.set_initial_vocabulary(&base_enc, true);
    dec.set_initial_vocabulary(&base_dec, true);

    // Base entries resolve by index without any session-local growth.
    assert_eq!(
        enc.character_content_chunk.obtain_index("beta"),
        Obtained::Found(1)
    );
    assert_eq!(dec.character_content_chunk.get(1).unwrap(), "beta");

    // Fresh entries continue above the base's top index on both sides.
    let index = enc
        .character_content_chunk
        .obtain_index("gamma")
        .index()
        .unwrap();
    assert_eq!(index, 2);
    assert_eq!(dec.character_content_chunk.add("gamma".to_string()), 2);
}

#[test]
fn layering_precedence_starts_above_base() {
    let mut base = EncoderVocabulary::new();
    for value in ["a", "b", "c"] {
        base.local_name.obtain_index(value);
    }
    let base = base.into_shared();

    let mut enc = EncoderVocabulary::new();
    enc.set_initial_vocabulary(&base, false);
    assert_eq!(enc.local_name.obtain_index("d"), Obtained::Added(3));
    assert_eq!(enc.local_name.get("a"), Some(0));
    assert_eq!(enc.local_name.get("c"), Some(2));
}

#[test]
fn encode_time_scenario() {
    let mut enc = EncoderVocabulary::new();

    assert_eq!(enc.local_name.obtain_index("foo"), Obtained::Added(0));
    assert_eq!(enc.local_name.obtain_index("bar"), Obtained::Added(1));
    assert_eq!(enc.local_name.obtain_index("foo"), Obtained::Found(0));
    assert_eq!(enc.local_name.len(), 2);

    // Layering a base beneath existing local entries without clearing
    // keeps the stale local indices; the base occupies the low range, and
    // fresh entries continue above both regions. Swapping in a different
    // base is expected to use `clear = true` for exactly this reason.
    let mut base = EncoderVocabulary::new();
    base.local_name.obtain_index("x");
    base.local_name.obtain_index("y");
    enc.set_initial_vocabulary(&base.into_shared(), false);

    assert_eq!(enc.local_name.obtain_index("z"), Obtained::Added(4));
    assert_eq!(enc.local_name.get("x"), Some(0));
    assert_eq!(enc.local_name.get("foo"), Some(0));
}

#[test]
fn conversion_excludes_zero_length_tokens() {
    let vocabulary = Vocabulary {
        prefixes: vec!["".to_string()],
        local_names: vec!["".to_string(), "item".to_string()],
        attribute_values: vec!["".to_string()],
        element_names: vec![Name::new("", "", "")],
        ..Default::default()
    };

    let enc = EncoderVocabulary::from_vocabulary(&vocabulary, &VocabularyLimits::unbounded());
    assert_eq!(enc.local_name.get(""), None);
    assert_eq!(enc.local_name.get("item"), Some(0));
    assert_eq!(enc.attribute_value.len(), 0);
    assert_eq!(enc.element_name.len(), 0);

    let dec = DecoderVocabulary::from_vocabulary(&vocabulary);
    assert_eq!(dec.local_name.len(), 1);
    assert_eq!(dec.attribute_value.len(), 0);
    assert_eq!(dec.element_name.len(), 0);
    // Only the fixed entry remains in the prefix table.
    assert_eq!(dec.prefix.len(), 1);
}

#[test]
fn fixed_entries_are_invariant() {
    let enc = EncoderVocabulary::new();
    let dec = DecoderVocabulary::new();

    assert_eq!(enc.prefix.get(XML_PREFIX), Some(RESERVED_XML_INDEX));
    assert_eq!(
        enc.namespace_name.get(XML_NAMESPACE_NAME),
        Some(RESERVED_XML_INDEX)
    );
    assert_eq!(dec.prefix.get(RESERVED_XML_INDEX).unwrap(), XML_PREFIX);
    assert_eq!(
        dec.namespace_name.get(RESERVED_XML_INDEX).unwrap(),
        XML_NAMESPACE_NAME
    );
}

#[test]
fn capacity_is_policy_not_error() {
    let limits = VocabularyLimits::unbounded().with(
        TokenCategory::AttributeValue,
        TableLimits::default().with_max_entries(1),
    );
    let mut enc = EncoderVocabulary::with_limits(&limits);

    assert_eq!(enc.attribute_value.obtain_index("a"), Obtained::Added(0));
    assert_eq!(enc.attribute_value.obtain_index("b"), Obtained::Rejected);
    assert_eq!(enc.attribute_value.obtain_index("a"), Obtained::Found(0));
}

#[test]
fn exported_vocabulary_rebuilds_both_forms() {
    let mut enc = EncoderVocabulary::new();
    enc.obtain_element_name("p", "urn:a", "item");
    enc.obtain_attribute_name("", "urn:a", "id");
    enc.character_content_chunk.obtain_index("hello world");

    let exported = enc.to_vocabulary();

    let renc = EncoderVocabulary::from_vocabulary(&exported, &VocabularyLimits::unbounded());
    assert_eq!(renc.element_name.get("p", "urn:a", "item"), Some(0));
    assert_eq!(renc.attribute_name.get("", "urn:a", "id"), Some(0));

    let rdec = DecoderVocabulary::from_vocabulary(&exported);
    assert_eq!(rdec.element_name.get(0).unwrap().local_name, "item");
    assert_eq!(rdec.character_content_chunk.get(0).unwrap(), "hello world");
}
