use super::memory::errors::CounterError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Chip that owns an address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CpuType {
    /// Primary console CPU
    Cpu,
    /// Audio coprocessor
    Spc,
    /// DSP cartridge coprocessor
    NecDsp,
    Sa1,
    Gsu,
    Cx4,
    /// Handheld platform CPU
    Gameboy,
}

/// Physical memory-type category.
///
/// Every variant is an independently addressed resource. CPU-visible
/// (banked or mirrored) address spaces are not listed here: the bus
/// resolves those into one of these categories before reporting an access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryType {
    PrgRom,
    WorkRam,
    SaveRam,
    VideoRam,
    SpriteRam,
    CgRam,
    SpcRam,
    SpcRom,
    DspProgramRom,
    DspDataRom,
    DspDataRam,
    Sa1InternalRam,
    GsuWorkRam,
    Cx4DataRam,
    BsxPsRam,
    BsxMemoryPack,
    GbPrgRom,
    GbWorkRam,
    GbCartRam,
    GbHighRam,
    GbBootRom,
    GbVideoRam,
    GbSpriteRam,
    Register,
}

impl MemoryType {
    /// Number of categories
    pub const COUNT: usize = 24;

    /// All categories in ordinal order
    pub const ALL: [MemoryType; MemoryType::COUNT] = [
        MemoryType::PrgRom,
        MemoryType::WorkRam,
        MemoryType::SaveRam,
        MemoryType::VideoRam,
        MemoryType::SpriteRam,
        MemoryType::CgRam,
        MemoryType::SpcRam,
        MemoryType::SpcRom,
        MemoryType::DspProgramRom,
        MemoryType::DspDataRom,
        MemoryType::DspDataRam,
        MemoryType::Sa1InternalRam,
        MemoryType::GsuWorkRam,
        MemoryType::Cx4DataRam,
        MemoryType::BsxPsRam,
        MemoryType::BsxMemoryPack,
        MemoryType::GbPrgRom,
        MemoryType::GbWorkRam,
        MemoryType::GbCartRam,
        MemoryType::GbHighRam,
        MemoryType::GbBootRom,
        MemoryType::GbVideoRam,
        MemoryType::GbSpriteRam,
        MemoryType::Register,
    ];

    /// Ordinal used to index per-type storage
    pub fn index(self) -> usize {
        self as usize
    }

    /// Chip whose address space this category belongs to
    pub fn owner(self) -> CpuType {
        match self {
            MemoryType::PrgRom
            | MemoryType::WorkRam
            | MemoryType::SaveRam
            | MemoryType::VideoRam
            | MemoryType::SpriteRam
            | MemoryType::CgRam
            | MemoryType::BsxPsRam
            | MemoryType::BsxMemoryPack
            | MemoryType::Register => CpuType::Cpu,
            MemoryType::SpcRam | MemoryType::SpcRom => CpuType::Spc,
            MemoryType::DspProgramRom | MemoryType::DspDataRom | MemoryType::DspDataRam => {
                CpuType::NecDsp
            }
            MemoryType::Sa1InternalRam => CpuType::Sa1,
            MemoryType::GsuWorkRam => CpuType::Gsu,
            MemoryType::Cx4DataRam => CpuType::Cx4,
            MemoryType::GbPrgRom
            | MemoryType::GbWorkRam
            | MemoryType::GbCartRam
            | MemoryType::GbHighRam
            | MemoryType::GbBootRom
            | MemoryType::GbVideoRam
            | MemoryType::GbSpriteRam => CpuType::Gameboy,
        }
    }

    /// ROM categories, whose content is defined at power-on
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            MemoryType::PrgRom
                | MemoryType::SpcRom
                | MemoryType::DspProgramRom
                | MemoryType::DspDataRom
                | MemoryType::GbPrgRom
                | MemoryType::GbBootRom
        )
    }

    /// Short name used by debugger views
    pub fn name(self) -> &'static str {
        match self {
            MemoryType::PrgRom => "PrgRom",
            MemoryType::WorkRam => "WorkRam",
            MemoryType::SaveRam => "SaveRam",
            MemoryType::VideoRam => "VideoRam",
            MemoryType::SpriteRam => "SpriteRam",
            MemoryType::CgRam => "CgRam",
            MemoryType::SpcRam => "SpcRam",
            MemoryType::SpcRom => "SpcRom",
            MemoryType::DspProgramRom => "DspProgramRom",
            MemoryType::DspDataRom => "DspDataRom",
            MemoryType::DspDataRam => "DspDataRam",
            MemoryType::Sa1InternalRam => "Sa1InternalRam",
            MemoryType::GsuWorkRam => "GsuWorkRam",
            MemoryType::Cx4DataRam => "Cx4DataRam",
            MemoryType::BsxPsRam => "BsxPsRam",
            MemoryType::BsxMemoryPack => "BsxMemoryPack",
            MemoryType::GbPrgRom => "GbPrgRom",
            MemoryType::GbWorkRam => "GbWorkRam",
            MemoryType::GbCartRam => "GbCartRam",
            MemoryType::GbHighRam => "GbHighRam",
            MemoryType::GbBootRom => "GbBootRom",
            MemoryType::GbVideoRam => "GbVideoRam",
            MemoryType::GbSpriteRam => "GbSpriteRam",
            MemoryType::Register => "Register",
        }
    }
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MemoryType {
    type Err = CounterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryType::ALL
            .iter()
            .copied()
            .find(|memory_type| memory_type.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CounterError::UnknownMemoryType(s.to_string()))
    }
}

/// A bus access resolved to a physical location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Offset within the region; negative when the bus could not map the access
    pub address: i32,
    pub memory_type: MemoryType,
}

impl AddressInfo {
    /// Create a new resolved address
    pub fn new(address: i32, memory_type: MemoryType) -> Self {
        Self {
            address,
            memory_type,
        }
    }

    /// Address that did not resolve to any physical resource
    pub fn unmapped(memory_type: MemoryType) -> Self {
        Self {
            address: -1,
            memory_type,
        }
    }

    /// Offset as an index into the region, if mapped
    pub fn offset(&self) -> Option<usize> {
        usize::try_from(self.address).ok()
    }
}

impl std::fmt::Display for AddressInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.offset() {
            Some(offset) => write!(f, "{}:${:06X}", self.memory_type, offset),
            None => write!(f, "{}:unmapped", self.memory_type),
        }
    }
}

/// Identifies one region layout (one cartridge load)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Issue a fresh session identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_all_table() {
        for (i, memory_type) in MemoryType::ALL.iter().enumerate() {
            assert_eq!(memory_type.index(), i);
        }
        assert_eq!(MemoryType::Register.index(), MemoryType::COUNT - 1);
    }

    #[test]
    fn test_name_round_trip() {
        for memory_type in MemoryType::ALL {
            assert_eq!(memory_type.name().parse::<MemoryType>().unwrap(), memory_type);
        }
        assert_eq!("workram".parse::<MemoryType>().unwrap(), MemoryType::WorkRam);
    }

    #[test]
    fn test_unknown_name() {
        match "Vram2".parse::<MemoryType>() {
            Err(CounterError::UnknownMemoryType(name)) => assert_eq!(name, "Vram2"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_owner_and_read_only() {
        assert_eq!(MemoryType::SpcRam.owner(), CpuType::Spc);
        assert_eq!(MemoryType::GbHighRam.owner(), CpuType::Gameboy);
        assert_eq!(MemoryType::Cx4DataRam.owner(), CpuType::Cx4);
        assert!(MemoryType::PrgRom.is_read_only());
        assert!(MemoryType::GbBootRom.is_read_only());
        assert!(!MemoryType::WorkRam.is_read_only());
        assert!(!MemoryType::Register.is_read_only());
    }

    #[test]
    fn test_unmapped_address() {
        let info = AddressInfo::unmapped(MemoryType::WorkRam);
        assert_eq!(info.offset(), None);
        assert_eq!(AddressInfo::new(0x100, MemoryType::WorkRam).offset(), Some(0x100));
        assert_eq!(AddressInfo::new(0x100, MemoryType::WorkRam).to_string(), "WorkRam:$000100");
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
