//! Input validation run before any casting or I/O.

use lazy_static::lazy_static;
use regex::Regex;

use crate::common::{ActorId, RecordError, RecordId, RecordResult};

lazy_static! {
    // Collection slugs: a letter, then letters, digits, `_` or `-`
    static ref TYPE_SLUG_REGEX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_-]{0,63}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInput {
    pub collection: String,
    pub actor: ActorId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInput {
    pub collection: String,
    pub id: RecordId,
    pub actor: ActorId,
}

/// Target of a delete or a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTarget {
    pub collection: String,
    pub id: RecordId,
}

pub fn normalize_type(raw: &str) -> RecordResult<String> {
    let slug = raw.trim();
    if TYPE_SLUG_REGEX.is_match(slug) {
        Ok(slug.to_string())
    } else {
        Err(RecordError::InvalidType(raw.to_string()))
    }
}

pub fn normalize_record_id(raw: &str) -> RecordResult<RecordId> {
    RecordId::parse(raw).map_err(|_| RecordError::InvalidId(raw.to_string()))
}

pub fn normalize_actor(raw: &str) -> RecordResult<ActorId> {
    ActorId::parse(raw).map_err(|_| RecordError::InvalidActor(raw.to_string()))
}

pub fn validate_create(type_slug: &str, actor_id: &str) -> RecordResult<CreateInput> {
    Ok(CreateInput {
        collection: normalize_type(type_slug)?,
        actor: normalize_actor(actor_id)?,
    })
}

pub fn validate_update(type_slug: &str, id: &str, actor_id: &str) -> RecordResult<UpdateInput> {
    Ok(UpdateInput {
        collection: normalize_type(type_slug)?,
        id: normalize_record_id(id)?,
        actor: normalize_actor(actor_id)?,
    })
}

pub fn validate_target(type_slug: &str, id: &str) -> RecordResult<RecordTarget> {
    Ok(RecordTarget {
        collection: normalize_type(type_slug)?,
        id: normalize_record_id(id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_slugs() {
        assert_eq!(normalize_type("clienti").unwrap(), "clienti");
        assert_eq!(normalize_type(" preventivi ").unwrap(), "preventivi");
        assert_eq!(normalize_type("event_types-2").unwrap(), "event_types-2");

        let too_long = "x".repeat(65);
        for bad in ["", "  ", "1clienti", "clienti.data", "a b", "$where", too_long.as_str()] {
            let err = normalize_type(bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_TYPE", "{bad:?}");
        }
    }

    #[test]
    fn test_validate_update_reports_first_bad_field() {
        let id = RecordId::new().to_string();
        let actor = ActorId::new().to_string();

        assert!(validate_update("clienti", &id, &actor).is_ok());
        assert_eq!(
            validate_update("clienti", "r1", &actor).unwrap_err().code(),
            "INVALID_ID"
        );
        assert_eq!(
            validate_update("clienti", &id, "u9").unwrap_err().code(),
            "INVALID_ACTOR"
        );
        assert_eq!(
            validate_update("", "r1", "u9").unwrap_err().code(),
            "INVALID_TYPE"
        );
    }

    #[test]
    fn test_validate_create_and_target() {
        let actor = ActorId::new();
        let input = validate_create("fatture", &actor.to_string()).unwrap();
        assert_eq!(input.actor, actor);
        assert_eq!(input.collection, "fatture");

        assert_eq!(
            validate_create("fatture", "nobody").unwrap_err().code(),
            "INVALID_ACTOR"
        );
        assert_eq!(
            validate_target("fatture", "42").unwrap_err().code(),
            "INVALID_ID"
        );
    }
}
