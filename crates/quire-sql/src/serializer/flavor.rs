use super::Serializer;

use quire_core::driver::Capability;

pub(super) use quire_core::driver::SqlFlavor as Flavor;

impl Serializer {
    pub fn sqlite() -> Serializer {
        Serializer {
            flavor: Flavor::Sqlite,
        }
    }

    pub fn postgresql() -> Serializer {
        Serializer {
            flavor: Flavor::Postgresql,
        }
    }

    pub fn mysql() -> Serializer {
        Serializer {
            flavor: Flavor::Mysql,
        }
    }

    /// The serializer for the dialect a driver speaks.
    pub fn for_capability(capability: &Capability) -> Serializer {
        Serializer {
            flavor: capability.sql_flavor,
        }
    }

    /// The SQL dialect statements are rendered in.
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }
}
