//! Marker registry: per-tag binary readers and text parsers.
//!
//! The table is built once, from an exhaustive `match` over [`MarkerType`],
//! so a new marker kind cannot be added without a registry entry. The table
//! is validated when first used; a bad table is a programming error and
//! panics.

use std::sync::OnceLock;

use crate::codec::MarkerReader;
use crate::core::Coord;
use crate::error::{MarkerError, ParseError, ParseErrorKind};

use super::{
    read_record, CorruptionMarker, DoorSealMarker, FeatureMarker, MalignGatewayMarker, Marker,
    MarkerRecord, MarkerType, PhoenixMarker, PositionMarker, ScriptedMarker, TerrainChangeMarker,
    TombMarker, WizPropsMarker,
};

/// Reads a marker's fields once its tag and position are known.
pub type ReadFn = fn(&mut MarkerReader<'_>, Coord) -> Result<Marker, MarkerError>;

/// Parses the body of a marker's text form (the part after `<name>:`).
/// The second argument is the caller's context string.
pub type ParseFn = fn(&str, &str) -> Result<Marker, ParseErrorKind>;

/// Registry row for one marker kind.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub kind: MarkerType,
    pub reader: ReadFn,
    /// `None` for kinds without a text form.
    pub parser: Option<ParseFn>,
}

impl RegistryEntry {
    /// The kind's text-form name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl std::fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("kind", &self.kind)
            .field("has_parser", &self.parser.is_some())
            .finish()
    }
}

fn read_plain<T>(r: &mut MarkerReader<'_>, pos: Coord) -> Result<Marker, MarkerError>
where
    T: MarkerRecord + Into<Marker>,
{
    read_record::<T>(r, pos).map(Into::into)
}

fn read_scripted(r: &mut MarkerReader<'_>, pos: Coord) -> Result<Marker, MarkerError> {
    ScriptedMarker::read(r, pos).map(Marker::Scripted)
}

fn entry_for(kind: MarkerType) -> RegistryEntry {
    let (reader, parser): (ReadFn, Option<ParseFn>) = match kind {
        MarkerType::Feature => (read_plain::<FeatureMarker>, Some(FeatureMarker::parse)),
        MarkerType::Scripted => (read_scripted, Some(ScriptedMarker::parse)),
        MarkerType::Corruption => (read_plain::<CorruptionMarker>, None),
        MarkerType::WizProps => (read_plain::<WizPropsMarker>, Some(WizPropsMarker::parse)),
        MarkerType::Tomb => (read_plain::<TombMarker>, None),
        MarkerType::MalignGateway => (read_plain::<MalignGatewayMarker>, None),
        MarkerType::Phoenix => (read_plain::<PhoenixMarker>, None),
        MarkerType::Position => (read_plain::<PositionMarker>, None),
        MarkerType::DoorSeal => (read_plain::<DoorSealMarker>, None),
        MarkerType::TerrainChange => (read_plain::<TerrainChangeMarker>, None),
    };
    RegistryEntry {
        kind,
        reader,
        parser,
    }
}

/// Extra text-form names. `lua_mapless` comes from map files that declare
/// scripts outside any map; the context label is all that differs here.
const TEXT_ALIASES: &[(&str, MarkerType)] = &[("lua_mapless", MarkerType::Scripted)];

/// Why a registry table was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
enum RegistryError {
    /// Entry at `slot` is for a kind with a different tag.
    SlotMismatch { slot: usize, kind: MarkerType },
    /// Two kinds share a text-form name.
    DuplicateName(&'static str),
    /// An alias shadows another name or targets a kind without a text form.
    BadAlias(&'static str),
}

/// Lookup table from tag and name to marker entry points.
#[derive(Debug)]
pub struct MarkerRegistry {
    entries: [RegistryEntry; MarkerType::COUNT],
    aliases: &'static [(&'static str, MarkerType)],
}

impl MarkerRegistry {
    fn build() -> Self {
        Self {
            entries: MarkerType::ALL.map(entry_for),
            aliases: TEXT_ALIASES,
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        for (slot, entry) in self.entries.iter().enumerate() {
            if usize::from(entry.kind.tag()) != slot {
                return Err(RegistryError::SlotMismatch {
                    slot,
                    kind: entry.kind,
                });
            }
            if self.entries[..slot].iter().any(|e| e.name() == entry.name()) {
                return Err(RegistryError::DuplicateName(entry.name()));
            }
        }
        for (i, &(alias, kind)) in self.aliases.iter().enumerate() {
            let shadows = self.entries.iter().any(|e| e.name() == alias)
                || self.aliases[..i].iter().any(|&(a, _)| a == alias);
            if shadows || self.entry(kind).parser.is_none() {
                return Err(RegistryError::BadAlias(alias));
            }
        }
        Ok(())
    }

    /// Entry for `kind`.
    #[must_use]
    pub fn entry(&self, kind: MarkerType) -> &RegistryEntry {
        &self.entries[usize::from(kind.tag())]
    }

    /// Entry for a persisted tag.
    #[must_use]
    pub fn lookup_tag(&self, tag: u16) -> Option<&RegistryEntry> {
        self.entries.get(usize::from(tag))
    }

    /// Entry for a text-form name or alias. Names are case-sensitive.
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.name() == name).or_else(|| {
            self.aliases
                .iter()
                .find(|&&(alias, _)| alias == name)
                .map(|&(_, kind)| self.entry(kind))
        })
    }

    /// All entries, in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Read one marker: tag, position, then the kind's fields.
    pub fn read(&self, r: &mut MarkerReader<'_>) -> Result<Marker, MarkerError> {
        let tag = r.read_u16()?;
        let entry = self
            .lookup_tag(tag)
            .ok_or(MarkerError::UnknownTag { tag })?;
        let pos = r.read_coord()?;
        let marker = (entry.reader)(r, pos)?;
        tracing::trace!(kind = %entry.kind, %pos, "read marker");
        Ok(marker)
    }

    /// Parse a marker text form `<name>:<body>`.
    ///
    /// The result sits at [`Coord::ORIGIN`]; the caller places it.
    pub fn parse(&self, text: &str, context: &str) -> Result<Marker, ParseError> {
        let error = |kind: ParseErrorKind| ParseError::new(text, context, kind);

        let (name, body) = text
            .split_once(':')
            .ok_or_else(|| error(ParseErrorKind::MissingKind))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(error(ParseErrorKind::MissingKind));
        }

        let entry = self
            .lookup_name(name)
            .ok_or_else(|| error(ParseErrorKind::UnknownKind(name.to_string())))?;
        let parser = entry
            .parser
            .ok_or_else(|| error(ParseErrorKind::NoTextForm(entry.kind)))?;
        parser(body, context).map_err(error)
    }
}

/// The process-wide marker registry.
///
/// # Panics
///
/// On first use, if the built-in table is inconsistent.
pub fn registry() -> &'static MarkerRegistry {
    static REGISTRY: OnceLock<MarkerRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = MarkerRegistry::build();
        if let Err(err) = registry.validate() {
            panic!("invalid marker registry: {err:?}");
        }
        tracing::debug!(kinds = MarkerType::COUNT, "marker registry built");
        registry
    })
}

/// Read one marker from `r`. An unknown tag is fatal for the stream.
pub fn read_marker(r: &mut MarkerReader<'_>) -> Result<Marker, MarkerError> {
    registry().read(r)
}

/// Parse a marker from its text form, e.g. `feat:deep_water`.
///
/// ```
/// use dungeon_markers::core::Feature;
/// use dungeon_markers::error::ParseErrorKind;
/// use dungeon_markers::markers::parse_marker;
///
/// let marker = parse_marker("feat: deep_water", "vault").unwrap();
/// assert_eq!(marker.as_feature().unwrap().feature, Feature::DeepWater);
///
/// let err = parse_marker("tomb:1", "vault").unwrap_err();
/// assert!(matches!(err.kind, ParseErrorKind::NoTextForm(_)));
/// ```
pub fn parse_marker(text: &str, context: &str) -> Result<Marker, ParseError> {
    registry().parse(text, context)
}
