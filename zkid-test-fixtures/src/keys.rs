//! Participant key lists and the Merkle leaves derived from them.

use num_traits::Zero;
use zkid_common::{default_leaf, parse_scalar, FieldHash, FixtureError, Result, Scalar};

use crate::ecdsa::KeyPair;

/// Ordered participant slots; `None` is a disabled or absent participant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParticipantKeys {
    slots: Vec<Option<Scalar>>,
}

impl ParticipantKeys {
    pub fn new(slots: Vec<Option<Scalar>>) -> Self {
        Self { slots }
    }

    /// Parse decimal / `0x` hex keys. `None` and the literal `0` disable a slot.
    pub fn parse<S: AsRef<str>>(texts: &[Option<S>]) -> Result<Self> {
        let slots = texts
            .iter()
            .map(|text| match text {
                None => Ok(None),
                Some(text) => {
                    let value = parse_scalar(text.as_ref())?;
                    Ok((!value.is_zero()).then_some(value))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { slots })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Scalar> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Key pair for the participant at `index`.
    pub fn key_pair(&self, index: usize) -> Result<KeyPair> {
        let secret = self.get(index).ok_or_else(|| {
            FixtureError::invalid_key(format!("participant {index} has no private key"))
        })?;
        KeyPair::from_secret(secret)
    }

    /// Copy of this list where only the `enabled` positions keep their key.
    pub fn enabled_subset(&self, enabled: &[usize]) -> Self {
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.clone().filter(|_| enabled.contains(&index)))
            .collect();
        Self { slots }
    }

    /// Number of slots holding a key.
    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// One leaf per slot: `hash1(address)` for a key, literal `0` otherwise.
    pub fn leaves<H: FieldHash>(&self, hasher: &H) -> Result<Vec<Scalar>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(secret) => participant_leaf(&KeyPair::from_secret(secret)?, hasher),
                None => Ok(default_leaf()),
            })
            .collect()
    }
}

/// Leaf committed to the eligibility tree for one participant.
pub fn participant_leaf<H: FieldHash>(pair: &KeyPair, hasher: &H) -> Result<Scalar> {
    Ok(hasher.hash1(&pair.address()?.to_scalar()))
}
