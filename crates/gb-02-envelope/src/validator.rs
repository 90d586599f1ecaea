//! # Envelope Validator
//!
//! Checks a constructed or received envelope against the immutable
//! per-class policy table. Validation is pure and deterministic, and
//! runs identically at construction time and at receipt time - there is
//! no trust-on-send shortcut.
//!
//! ## Check Order
//!
//! 1. **Structural** - sections present and internally consistent
//! 2. **Class lookup** - tag must be in this validator's closed table
//! 3. **Size** - serialized payload within the class ceiling
//! 4. **TTL** - header TTL within the class ceiling
//! 5. **Required fields** - class field set present in the payload
//! 6. **Security tier** - declared tier at or above the class minimum
//!
//! The first failing check wins; later checks are not evaluated.

use std::collections::HashMap;

use shared_types::{ClassPolicy, Envelope, ProtocolClass, ValidationError};

/// Validator over an immutable, closed class-policy table.
///
/// By default every class in the enumeration is admitted; a deployment
/// may restrict the set, in which case an envelope tagged with a
/// disabled class fails with `UnknownProtocolClass` exactly like a tag
/// from outside the enumeration would at decode time.
#[derive(Debug, Clone)]
pub struct EnvelopeValidator {
    table: HashMap<ProtocolClass, &'static ClassPolicy>,
}

impl EnvelopeValidator {
    /// Validator admitting every protocol class.
    pub fn new() -> Self {
        Self::with_classes(&ProtocolClass::ALL)
    }

    /// Validator admitting only the listed classes.
    pub fn with_classes(classes: &[ProtocolClass]) -> Self {
        let table = classes
            .iter()
            .map(|class| (*class, class.policy()))
            .collect();
        Self { table }
    }

    /// Validates one envelope against the policy table.
    ///
    /// # Errors
    /// The first failing check, in the documented order.
    pub fn validate(&self, envelope: &Envelope) -> Result<(), ValidationError> {
        // 1. Structural consistency.
        let header = &envelope.header;
        if header.expires_at_ms != header.created_at_ms.saturating_add(header.ttl_ms) {
            return Err(ValidationError::MissingSection("header"));
        }
        if header.hop_count > header.max_hops {
            return Err(ValidationError::MissingSection("header"));
        }
        if envelope.security.cipher.is_empty()
            || envelope.security.key_exchange.is_empty()
            || envelope.security.signature.is_empty()
        {
            return Err(ValidationError::MissingSection("security"));
        }
        let payload_class = envelope.payload.class();
        if payload_class != header.class {
            return Err(ValidationError::ClassMismatch {
                header: header.class.to_string(),
                payload: payload_class.to_string(),
            });
        }

        // 2. Class lookup.
        let policy = self
            .table
            .get(&header.class)
            .ok_or_else(|| ValidationError::UnknownProtocolClass(header.class.to_string()))?;

        // 3. Size.
        let size = bincode::serialized_size(&envelope.payload)
            .map_err(|_| ValidationError::MissingSection("payload"))?
            as usize;
        if size > policy.max_payload_bytes {
            return Err(ValidationError::PayloadTooLarge {
                size,
                max: policy.max_payload_bytes,
            });
        }

        // 4. TTL.
        if header.ttl_ms > policy.max_ttl_ms {
            return Err(ValidationError::TtlExceedsPolicy {
                ttl_ms: header.ttl_ms,
                max_ttl_ms: policy.max_ttl_ms,
            });
        }

        // 5. Required fields.
        let body = envelope.payload.body();
        for field in policy.required_fields {
            if !body.contains(field) {
                return Err(ValidationError::MissingRequiredField((*field).to_string()));
            }
        }

        // 6. Security tier.
        if envelope.security.tier < policy.min_tier {
            return Err(ValidationError::InsufficientSecurityTier {
                declared: envelope.security.tier.to_string(),
                required: policy.min_tier.to_string(),
            });
        }

        Ok(())
    }
}

impl Default for EnvelopeValidator {
    fn default() -> Self {
        Self::new()
    }
}
