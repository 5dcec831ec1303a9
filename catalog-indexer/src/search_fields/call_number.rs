//! Call number schemes and the sortable shelving order key.
//!
//! A key places a shelving order inside the band of its scheme: the scheme
//! rank selects one of the `1 << 60` wide bands and the shelving order
//! embedding its position inside the band. Comparing keys therefore compares
//! scheme precedence first and shelving order second.

/// Items of an instance.
pub(crate) const ITEMS_FIELD: &str = "items";

/// Effective call number components of an item.
pub(crate) const COMPONENTS_FIELD: &str = "effectiveCallNumberComponents";

/// Characters kept by normalization, in sort order.
const ALPHABET: &[u8] = b" .0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Base of the embedding: one digit per alphabet character plus padding.
const BASE: u64 = ALPHABET.len() as u64 + 1;

/// Number of leading characters that take part in the embedding.
///
/// `BASE^11 < 2^60`, so an embedding never leaves its band.
const EMBEDDING_LENGTH: usize = 11;

/// Width of each scheme band.
const BAND_SHIFT: u32 = 60;

/// Classification scheme of a call number.
///
/// Variants are declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CallNumberScheme {
    /// Tenant-defined scheme.
    Local,
    /// Library of Congress classification.
    LibraryOfCongress,
    /// Dewey Decimal classification.
    Dewey,
    /// National Library of Medicine classification.
    NationalLibraryOfMedicine,
    /// Superintendent of Documents classification.
    SuperintendentOfDocuments,
    /// System scheme for call numbers outside the known classifications.
    OtherScheme,
}

impl CallNumberScheme {
    /// The system schemes and the identifiers of their call number types.
    pub const SYSTEM_TYPES: [(Self, &'static str); 5] = [
        (Self::LibraryOfCongress, "95467209-6d7b-468b-94df-0f5d7ad2747d"),
        (Self::Dewey, "03dd64d0-5626-4ecd-8ece-4531e0069f35"),
        (Self::NationalLibraryOfMedicine, "054d460d-d6b9-4469-9e37-7a78a2266655"),
        (Self::SuperintendentOfDocuments, "fc388041-6cd0-4806-8a74-ebe3b9ab4c6e"),
        (Self::OtherScheme, "6caca63e-5651-4db6-9247-3205156e9699"),
    ];

    /// The system scheme identified by `type_id`, if any.
    pub fn from_system_type_id(type_id: &str) -> Option<Self> {
        Self::SYSTEM_TYPES
            .iter()
            .find(|(_, id)| *id == type_id)
            .map(|(scheme, _)| *scheme)
    }

    /// Precedence rank of the scheme; lower ranks sort first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Local => 0,
            Self::LibraryOfCongress => 1,
            Self::Dewey => 2,
            Self::NationalLibraryOfMedicine => 3,
            Self::SuperintendentOfDocuments => 4,
            Self::OtherScheme => 5,
        }
    }

    /// Sortable key of a shelving order within this scheme.
    ///
    /// Returns `None` when the shelving order has no characters left after
    /// normalization.
    pub fn shelving_order_key(&self, shelving_order: &str) -> Option<i64> {
        let normalized = normalize_shelving_order(shelving_order);
        if normalized.is_empty() {
            return None;
        }
        let band = (i64::from(self.rank()) + 1) << BAND_SHIFT;
        // The embedding is below 2^60 and always fits
        Some(band + shelving_order_embedding(&normalized) as i64)
    }
}

/// Normalize a shelving order for embedding.
///
/// Uppercases ASCII letters, turns whitespace into spaces, drops characters
/// outside the alphabet, collapses runs of spaces and trims.
pub fn normalize_shelving_order(shelving_order: &str) -> String {
    let mut normalized = String::with_capacity(shelving_order.len());
    for c in shelving_order.chars() {
        let c = if c.is_whitespace() {
            ' '
        } else {
            c.to_ascii_uppercase()
        };
        if !c.is_ascii() || !ALPHABET.contains(&(c as u8)) {
            continue;
        }
        if c == ' ' && (normalized.is_empty() || normalized.ends_with(' ')) {
            continue;
        }
        normalized.push(c);
    }
    if normalized.ends_with(' ') {
        normalized.pop();
    }
    normalized
}

/// Order-preserving embedding of a normalized shelving order.
///
/// The first characters are read as base-39 digits, missing characters count
/// as zero. Strings sharing their first `EMBEDDING_LENGTH` characters share an
/// embedding.
pub fn shelving_order_embedding(normalized: &str) -> u64 {
    let mut digits = normalized.bytes().map(|b| {
        ALPHABET
            .iter()
            .position(|&a| a == b)
            .map_or(0, |index| index as u64 + 1)
    });
    (0..EMBEDDING_LENGTH).fold(0, |embedding, _| {
        embedding * BASE + digits.next().unwrap_or(0)
    })
}
