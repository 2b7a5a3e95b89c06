//! Shape of the Aether backend tables this crate reads.
//!
//! The real database is created and owned by the Aether client; this DDL is
//! only executed for in-memory stores so they can be seeded in tests. Only
//! the columns the archiver reads are declared.

/// Idempotent DDL thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Boards (
    Fingerprint  VARCHAR(64) PRIMARY KEY,
    Name         VARCHAR(255) NOT NULL,
    Owner        VARCHAR(64) NOT NULL,
    Description  TEXT,
    Creation     INTEGER NOT NULL,
    Language     VARCHAR(3),
    LocalArrival INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Threads (
    Fingerprint  VARCHAR(64) PRIMARY KEY,
    Board        VARCHAR(64) NOT NULL,
    Name         VARCHAR(255) NOT NULL,
    Body         TEXT,
    Link         VARCHAR(5000),
    Owner        VARCHAR(64) NOT NULL,
    LocalArrival INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Posts (
    Fingerprint  VARCHAR(64) PRIMARY KEY,
    Board        VARCHAR(64) NOT NULL,
    Thread       VARCHAR(64) NOT NULL,   -- thread it belongs to
    Parent       VARCHAR(64) NOT NULL,   -- thread or post it replies to
    Body         TEXT,
    Owner        VARCHAR(64) NOT NULL,
    Creation     INTEGER NOT NULL,
    LocalArrival INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS Votes (
    Fingerprint  VARCHAR(64) PRIMARY KEY,
    Board        VARCHAR(64) NOT NULL,
    Thread       VARCHAR(64) NOT NULL,
    Target       VARCHAR(64) NOT NULL,   -- thread or post voted on
    Type         INTEGER NOT NULL,
    TypeClass    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS PublicKeys (
    Fingerprint  VARCHAR(64) PRIMARY KEY,
    Name         VARCHAR(64),
    Type         VARCHAR(64),
    PublicKey    TEXT
);

CREATE INDEX IF NOT EXISTS threads_board_idx ON Threads(Board);
CREATE INDEX IF NOT EXISTS posts_parent_idx  ON Posts(Thread, Parent);
CREATE INDEX IF NOT EXISTS votes_target_idx  ON Votes(Target);
";
