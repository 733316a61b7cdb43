//! Item identity encoding.

use aws_sdk_dynamodb::types::AttributeValue;

use dysync_types::{Identity, ItemError, KeySchema};

use crate::store::Item;

/// Derive the identity of `item` from its key attributes.
///
/// Key attributes must be present and string-typed.
pub fn encode(item: &Item, schema: &KeySchema) -> Result<Identity, ItemError> {
    let hash = string_attribute(item, &schema.hash_attribute)?;

    match &schema.range_attribute {
        Some(range_attribute) => {
            Ok(Identity::composite(hash, string_attribute(item, range_attribute)?))
        },
        None => Ok(Identity::single(hash)),
    }
}

fn string_attribute<'a>(item: &'a Item, attribute: &str) -> Result<&'a str, ItemError> {
    match item.get(attribute) {
        Some(AttributeValue::S(value)) => Ok(value.as_str()),
        Some(_) => Err(ItemError::NotString { attribute: attribute.to_string() }),
        None => Err(ItemError::MissingAttribute { attribute: attribute.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::string_item;

    #[test]
    fn test_encode_composite_round_trip() {
        let schema = KeySchema::composite("id", "sk");
        let item = string_item(&[("id", "1"), ("sk", "A"), ("payload", "x")]);

        let identity = encode(&item, &schema).expect("string keys");

        assert_eq!(identity.parts(), ("1", Some("A")));
    }

    #[test]
    fn test_encode_hash_only_ignores_other_attributes() {
        let schema = KeySchema::hash_only("pk");
        let item = string_item(&[("pk", "user#1"), ("sk", "ignored")]);

        assert_eq!(encode(&item, &schema), Ok(Identity::single("user#1")));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let schema = KeySchema::composite("id", "sk");
        let item = string_item(&[("id", "1"), ("sk", "A")]);

        assert_eq!(encode(&item, &schema), encode(&item.clone(), &schema));
    }

    #[test]
    fn test_missing_key_attribute() {
        let schema = KeySchema::composite("id", "sk");

        assert_eq!(
            encode(&string_item(&[("sk", "A")]), &schema),
            Err(ItemError::MissingAttribute { attribute: "id".to_string() })
        );
        assert_eq!(
            encode(&string_item(&[("id", "1")]), &schema),
            Err(ItemError::MissingAttribute { attribute: "sk".to_string() })
        );
    }

    #[test]
    fn test_numeric_key_is_not_string() {
        let schema = KeySchema::hash_only("id");
        let mut item = Item::new();
        item.insert("id".to_string(), AttributeValue::N("42".to_string()));

        assert_eq!(
            encode(&item, &schema),
            Err(ItemError::NotString { attribute: "id".to_string() })
        );
    }
}
