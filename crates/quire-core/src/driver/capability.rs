#[derive(Debug)]
pub struct Capability {
    /// SQL dialect the driver speaks
    pub sql_flavor: SqlFlavor,

    /// Supports native array columns and the `&&`, `@>`, `<@` operators.
    /// Drivers without it store arrays as JSON.
    pub native_arrays: bool,

    /// Supports `ILIKE`. Otherwise case-insensitive matches lower both sides.
    pub ilike: bool,
}

/// SQL dialects understood by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlFlavor {
    Sqlite,
    Postgresql,
    Mysql,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql_flavor: SqlFlavor::Sqlite,
        native_arrays: false,
        ilike: false,
    };

    /// PostgreSQL capabilities
    pub const POSTGRESQL: Self = Self {
        sql_flavor: SqlFlavor::Postgresql,
        native_arrays: true,
        ilike: true,
    };

    /// MySQL capabilities
    pub const MYSQL: Self = Self {
        sql_flavor: SqlFlavor::Mysql,
        ..Self::SQLITE
    };
}
