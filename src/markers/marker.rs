//! The polymorphic marker handle.

use crate::codec::MarkerWriter;
use crate::core::Coord;
use crate::error::MarkerError;
use crate::events::{DungeonEvent, EventListener};
use crate::script::ScriptHost;

use super::{
    CorruptionMarker, DoorSealMarker, FeatureMarker, MalignGatewayMarker, MarkerRecord,
    MarkerType, PhoenixMarker, PositionMarker, ScriptedMarker, TerrainChangeMarker, TombMarker,
    WizPropsMarker,
};

/// A marker of any kind.
///
/// Every operation matches exhaustively, so adding a kind is a compile
/// error until each operation handles it.
#[derive(Clone, Debug, PartialEq)]
pub enum Marker {
    Feature(FeatureMarker),
    Scripted(ScriptedMarker),
    Corruption(CorruptionMarker),
    WizProps(WizPropsMarker),
    Tomb(TombMarker),
    MalignGateway(MalignGatewayMarker),
    Phoenix(PhoenixMarker),
    Position(PositionMarker),
    DoorSeal(DoorSealMarker),
    TerrainChange(TerrainChangeMarker),
}

/// Match a marker, binding plain records to `$m` and the scripted marker to `$s`.
macro_rules! dispatch {
    ($marker:expr, $m:ident => $plain:expr, $s:ident => $scripted:expr) => {
        match $marker {
            Marker::Feature($m) => $plain,
            Marker::Corruption($m) => $plain,
            Marker::WizProps($m) => $plain,
            Marker::Tomb($m) => $plain,
            Marker::MalignGateway($m) => $plain,
            Marker::Phoenix($m) => $plain,
            Marker::Position($m) => $plain,
            Marker::DoorSeal($m) => $plain,
            Marker::TerrainChange($m) => $plain,
            Marker::Scripted($s) => $scripted,
        }
    };
}

impl Marker {
    /// The marker's kind, which also fixes its persisted tag.
    #[must_use]
    pub fn get_type(&self) -> MarkerType {
        match self {
            Marker::Feature(_) => MarkerType::Feature,
            Marker::Scripted(_) => MarkerType::Scripted,
            Marker::Corruption(_) => MarkerType::Corruption,
            Marker::WizProps(_) => MarkerType::WizProps,
            Marker::Tomb(_) => MarkerType::Tomb,
            Marker::MalignGateway(_) => MarkerType::MalignGateway,
            Marker::Phoenix(_) => MarkerType::Phoenix,
            Marker::Position(_) => MarkerType::Position,
            Marker::DoorSeal(_) => MarkerType::DoorSeal,
            Marker::TerrainChange(_) => MarkerType::TerrainChange,
        }
    }

    /// Cell the marker sits on.
    #[must_use]
    pub fn pos(&self) -> Coord {
        dispatch!(self, m => m.pos(), s => s.pos)
    }

    /// Move the marker. A stored marker should be moved through the store.
    pub fn set_pos(&mut self, pos: Coord) {
        dispatch!(self, m => m.set_pos(pos), s => s.pos = pos)
    }

    /// Run the marker's activation hook. Only scripted markers do anything.
    pub fn activate(&self, host: &dyn ScriptHost, verbose: bool) {
        if let Marker::Scripted(s) = self {
            s.activate(host, verbose);
        }
    }

    /// Write tag, position, then the kind's fields.
    pub fn write(&self, w: &mut MarkerWriter<'_>, host: &dyn ScriptHost) -> Result<(), MarkerError> {
        tracing::trace!(kind = %self.get_type(), pos = %self.pos(), "writing marker");
        w.write_u16(self.get_type().tag())?;
        w.write_coord(self.pos())?;
        dispatch!(self, m => m.write_fields(w), s => s.write_fields(w, host))
    }

    /// One-line human-readable description.
    #[must_use]
    pub fn debug_describe(&self, host: &dyn ScriptHost) -> String {
        dispatch!(self, m => m.describe(), s => s.describe(host))
    }

    /// Look up a named property. Empty values read as absent.
    #[must_use]
    pub fn property(&self, name: &str, host: &dyn ScriptHost) -> Option<String> {
        dispatch!(self, m => m.property(name), s => s.property(host, name))
            .filter(|value| !value.is_empty())
    }

    /// Set a named property, returning the previous value.
    ///
    /// Only wizard-property and scripted markers accept writes.
    pub fn set_property(
        &mut self,
        host: &dyn ScriptHost,
        key: &str,
        value: &str,
    ) -> Result<Option<String>, MarkerError> {
        match self {
            Marker::WizProps(m) => Ok(m.set_property(key, value)),
            Marker::Scripted(s) => Ok(s.set_property(host, key, value)),
            other => Err(MarkerError::ReadOnlyProperties {
                kind: other.get_type(),
            }),
        }
    }

    /// Like `clone`, but a bound scripted marker hands its live state to
    /// the copy.
    #[must_use]
    pub fn duplicate(&self, host: &dyn ScriptHost) -> Marker {
        match self {
            Marker::Scripted(s) => Marker::Scripted(s.duplicate(host)),
            other => other.clone(),
        }
    }

    /// Free script resources held by the marker.
    pub fn release(&mut self, host: &dyn ScriptHost) {
        if let Marker::Scripted(s) = self {
            s.release(host);
        }
    }

    /// The feature record, if this is one.
    pub fn as_feature(&self) -> Option<&FeatureMarker> {
        match self {
            Marker::Feature(m) => Some(m),
            _ => None,
        }
    }

    /// The scripted record, if this is one.
    pub fn as_scripted(&self) -> Option<&ScriptedMarker> {
        match self {
            Marker::Scripted(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to the scripted marker, if this is one.
    pub fn as_scripted_mut(&mut self) -> Option<&mut ScriptedMarker> {
        match self {
            Marker::Scripted(m) => Some(m),
            _ => None,
        }
    }

    /// The corruption record, if this is one.
    pub fn as_corruption(&self) -> Option<&CorruptionMarker> {
        match self {
            Marker::Corruption(m) => Some(m),
            _ => None,
        }
    }

    /// The wizard-property record, if this is one.
    pub fn as_wiz_props(&self) -> Option<&WizPropsMarker> {
        match self {
            Marker::WizProps(m) => Some(m),
            _ => None,
        }
    }

    /// The tomb record, if this is one.
    pub fn as_tomb(&self) -> Option<&TombMarker> {
        match self {
            Marker::Tomb(m) => Some(m),
            _ => None,
        }
    }

    /// The malign gateway record, if this is one.
    pub fn as_malign_gateway(&self) -> Option<&MalignGatewayMarker> {
        match self {
            Marker::MalignGateway(m) => Some(m),
            _ => None,
        }
    }

    /// The phoenix record, if this is one.
    pub fn as_phoenix(&self) -> Option<&PhoenixMarker> {
        match self {
            Marker::Phoenix(m) => Some(m),
            _ => None,
        }
    }

    /// The position record, if this is one.
    pub fn as_position(&self) -> Option<&PositionMarker> {
        match self {
            Marker::Position(m) => Some(m),
            _ => None,
        }
    }

    /// The door seal record, if this is one.
    pub fn as_door_seal(&self) -> Option<&DoorSealMarker> {
        match self {
            Marker::DoorSeal(m) => Some(m),
            _ => None,
        }
    }

    /// The terrain change record, if this is one.
    pub fn as_terrain_change(&self) -> Option<&TerrainChangeMarker> {
        match self {
            Marker::TerrainChange(m) => Some(m),
            _ => None,
        }
    }
}

impl EventListener for Marker {
    fn notify(&self, event: &DungeonEvent, host: &dyn ScriptHost) -> bool {
        match self {
            Marker::Scripted(s) => s.notify(event, host),
            _ => false,
        }
    }
}

macro_rules! impl_from_record {
    ($($record:ty => $case:ident),* $(,)?) => {
        $(
            impl From<$record> for Marker {
                fn from(record: $record) -> Self {
                    Marker::$case(record)
                }
            }
        )*
    };
}

impl_from_record! {
    FeatureMarker => Feature,
    ScriptedMarker => Scripted,
    CorruptionMarker => Corruption,
    WizPropsMarker => WizProps,
    TombMarker => Tomb,
    MalignGatewayMarker => MalignGateway,
    PhoenixMarker => Phoenix,
    PositionMarker => Position,
    DoorSealMarker => DoorSeal,
    TerrainChangeMarker => TerrainChange,
}
