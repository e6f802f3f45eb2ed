//! Dungeon features and terrain-change kinds.
//!
//! Only the features markers actually refer to are listed. The name table
//! doubles as the vocabulary of the `feat:` text form.

byte_enum! {
    /// A dungeon feature (terrain type) a cell can show.
    pub enum Feature {
        /// Never seen; also the "no override" value of a blank feature marker.
        Unseen = 0 => "unseen",
        ClosedDoor = 1 => "closed_door",
        RunedDoor = 2 => "runed_door",
        SealedDoor = 3 => "sealed_door",
        Tree = 4 => "tree",
        RockWall = 5 => "rock_wall",
        StoneWall = 6 => "stone_wall",
        MetalWall = 7 => "metal_wall",
        CrystalWall = 8 => "crystal_wall",
        PermarockWall = 9 => "permarock_wall",
        Grate = 10 => "iron_grate",
        Statue = 11 => "granite_statue",
        Lava = 12 => "lava",
        DeepWater = 13 => "deep_water",
        ShallowWater = 14 => "shallow_water",
        Floor = 15 => "floor",
        OpenDoor = 16 => "open_door",
        StairsDown = 17 => "stone_stairs_down",
        StairsUp = 18 => "stone_stairs_up",
        EscapeHatchDown = 19 => "escape_hatch_down",
        EscapeHatchUp = 20 => "escape_hatch_up",
        EnterAbyss = 21 => "enter_abyss",
        ExitAbyss = 22 => "exit_abyss",
        MalignGateway = 23 => "malign_gateway",
        Altar = 24 => "altar",
        Fountain = 25 => "fountain",
        Trap = 26 => "trap",
    }
}

impl Feature {
    /// Doors, in any state.
    #[must_use]
    pub const fn is_door(self) -> bool {
        matches!(
            self,
            Feature::ClosedDoor | Feature::RunedDoor | Feature::SealedDoor | Feature::OpenDoor
        )
    }
}

byte_enum! {
    /// Why a terrain-change marker altered its cell.
    pub enum TerrainChangeKind {
        Generic = 0 => "generic",
        Flood = 1 => "flood",
        Tomb = 2 => "tomb",
        Imprison = 3 => "imprison",
        DoorSeal = 4 => "door_seal",
        Bog = 5 => "bog",
        Forested = 6 => "forested",
    }
}
