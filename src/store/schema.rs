//! SQLite schema and the statements the store runs against it.
//!
//! Placeholders are positional `?` throughout. The reference lookup is the
//! only statement with a variable number of parameters; see
//! [`references_query`].

/// Current schema version, stored in the `meta` table.
pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS food_group (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS food_type (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS language (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS food (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    strain TEXT,
    brand TEXT,
    observation TEXT,
    group_id INTEGER NOT NULL REFERENCES food_group (id),
    type_id INTEGER NOT NULL REFERENCES food_type (id),
    scientific_name TEXT,
    subspecies TEXT
);

CREATE TABLE IF NOT EXISTS food_translation (
    food_id INTEGER NOT NULL REFERENCES food (id) ON DELETE CASCADE,
    language_id INTEGER NOT NULL REFERENCES language (id),
    common_name TEXT,
    ingredients TEXT,
    PRIMARY KEY (food_id, language_id)
);

CREATE TABLE IF NOT EXISTS nutrient (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    type TEXT NOT NULL,
    measurement_unit TEXT NOT NULL,
    standardized INTEGER NOT NULL DEFAULT 0,
    note TEXT
);

CREATE TABLE IF NOT EXISTS nutrient_component (
    id INTEGER PRIMARY KEY REFERENCES nutrient (id),
    macronutrient_id INTEGER NOT NULL REFERENCES nutrient (id)
);

CREATE TABLE IF NOT EXISTS micronutrient (
    id INTEGER PRIMARY KEY REFERENCES nutrient (id),
    type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS measurement (
    id INTEGER PRIMARY KEY,
    food_id INTEGER NOT NULL REFERENCES food (id) ON DELETE CASCADE,
    nutrient_id INTEGER NOT NULL REFERENCES nutrient (id),
    average REAL NOT NULL,
    deviation REAL,
    min REAL,
    max REAL,
    sample_size INTEGER,
    data_type TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS measurement_food_idx ON measurement (food_id);

CREATE TABLE IF NOT EXISTS city (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS journal (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS author (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS reference_work (
    code INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    type TEXT NOT NULL,
    other TEXT,
    year INTEGER,
    city_id INTEGER REFERENCES city (id),
    page_start INTEGER,
    page_end INTEGER,
    volume INTEGER,
    issue INTEGER,
    volume_year INTEGER,
    journal_id INTEGER REFERENCES journal (id)
);

CREATE TABLE IF NOT EXISTS reference_author (
    reference_code INTEGER NOT NULL REFERENCES reference_work (code) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES author (id),
    position INTEGER NOT NULL,
    PRIMARY KEY (reference_code, position)
);

CREATE TABLE IF NOT EXISTS measurement_reference (
    measurement_id INTEGER NOT NULL REFERENCES measurement (id) ON DELETE CASCADE,
    reference_code INTEGER NOT NULL REFERENCES reference_work (code),
    PRIMARY KEY (measurement_id, reference_code)
);

CREATE TABLE IF NOT EXISTS langual_code (
    id INTEGER PRIMARY KEY,
    code TEXT NOT NULL UNIQUE,
    descriptor TEXT NOT NULL,
    parent_id INTEGER REFERENCES langual_code (id)
);

CREATE TABLE IF NOT EXISTS food_langual_code (
    food_id INTEGER NOT NULL REFERENCES food (id) ON DELETE CASCADE,
    langual_id INTEGER NOT NULL REFERENCES langual_code (id),
    PRIMARY KEY (food_id, langual_id)
);
";

pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM meta WHERE key = 'version'";

pub const INSERT_SCHEMA_VERSION: &str = "INSERT INTO meta (key, value) VALUES ('version', ?)";

const SELECT_FOOD: &str = "
SELECT f.id, f.code, f.strain, f.brand, f.observation,
       g.code, g.name, t.code, t.name,
       f.scientific_name, f.subspecies
FROM food f
JOIN food_group g ON g.id = f.group_id
JOIN food_type t ON t.id = f.type_id";

pub const SELECT_TRANSLATIONS: &str = "
SELECT l.code, ft.common_name, ft.ingredients
FROM food_translation ft
JOIN language l ON l.id = ft.language_id
WHERE ft.food_id = ?
ORDER BY l.code";

/// One row per (measurement, cited reference); measurements without
/// references appear once with a NULL code.
pub const SELECT_MEASUREMENTS: &str = "
SELECT m.id, n.id, n.name, n.type, nc.macronutrient_id, mn.type,
       n.measurement_unit, m.average, m.deviation, m.min, m.max,
       m.sample_size, n.standardized, m.data_type, n.note,
       mr.reference_code
FROM measurement m
JOIN nutrient n ON n.id = m.nutrient_id
LEFT JOIN nutrient_component nc ON nc.id = n.id
LEFT JOIN micronutrient mn ON mn.id = n.id
LEFT JOIN measurement_reference mr ON mr.measurement_id = m.id
WHERE m.food_id = ?
ORDER BY m.id, mr.reference_code";

pub const SELECT_LANGUAL_CODES: &str = "
SELECT lc.code, lc.descriptor, p.code, p.descriptor
FROM food_langual_code fl
JOIN langual_code lc ON lc.id = fl.langual_id
LEFT JOIN langual_code p ON p.id = lc.parent_id
WHERE fl.food_id = ?
ORDER BY lc.code";

pub const COUNT_FOODS: &str = "SELECT COUNT(*) FROM food";

// Seed statements

pub const INSERT_FOOD_GROUP: &str = "INSERT INTO food_group (code, name) VALUES (?, ?)";

pub const INSERT_FOOD_TYPE: &str = "INSERT INTO food_type (code, name) VALUES (?, ?)";

pub const INSERT_LANGUAGE: &str = "INSERT INTO language (code, name) VALUES (?, ?)";

pub const INSERT_NUTRIENT: &str = "
INSERT INTO nutrient (id, name, type, measurement_unit, standardized, note)
VALUES (?, ?, ?, ?, ?, ?)";

pub const INSERT_NUTRIENT_COMPONENT: &str =
    "INSERT INTO nutrient_component (id, macronutrient_id) VALUES (?, ?)";

pub const INSERT_MICRONUTRIENT: &str = "INSERT INTO micronutrient (id, type) VALUES (?, ?)";

pub const INSERT_LANGUAL_CODE: &str = "INSERT INTO langual_code (code, descriptor) VALUES (?, ?)";

pub const UPDATE_LANGUAL_PARENT: &str = "
UPDATE langual_code
SET parent_id = (SELECT p.id FROM langual_code p WHERE p.code = ?)
WHERE code = ?";

pub const INSERT_CITY: &str = "INSERT OR IGNORE INTO city (name) VALUES (?)";

pub const INSERT_JOURNAL: &str = "INSERT OR IGNORE INTO journal (name) VALUES (?)";

pub const INSERT_AUTHOR: &str = "INSERT OR IGNORE INTO author (name) VALUES (?)";

pub const INSERT_REFERENCE: &str = "
INSERT INTO reference_work (
    code, title, type, other, year, city_id, page_start, page_end,
    volume, issue, volume_year, journal_id
)
VALUES (
    ?, ?, ?, ?, ?, (SELECT id FROM city WHERE name = ?), ?, ?,
    ?, ?, ?, (SELECT id FROM journal WHERE name = ?)
)";

pub const INSERT_REFERENCE_AUTHOR: &str = "
INSERT INTO reference_author (reference_code, author_id, position)
VALUES (?, (SELECT id FROM author WHERE name = ?), ?)";

pub const INSERT_FOOD: &str = "
INSERT INTO food (
    id, code, strain, brand, observation, group_id, type_id,
    scientific_name, subspecies
)
VALUES (
    ?, ?, ?, ?, ?,
    (SELECT id FROM food_group WHERE code = ?),
    (SELECT id FROM food_type WHERE code = ?),
    ?, ?
)";

pub const INSERT_TRANSLATION: &str = "
INSERT INTO food_translation (food_id, language_id, common_name, ingredients)
VALUES (?, (SELECT id FROM language WHERE code = ?), ?, ?)";

pub const INSERT_MEASUREMENT: &str = "
INSERT INTO measurement (
    food_id, nutrient_id, average, deviation, min, max, sample_size, data_type
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

pub const INSERT_MEASUREMENT_REFERENCE: &str =
    "INSERT INTO measurement_reference (measurement_id, reference_code) VALUES (?, ?)";

pub const INSERT_FOOD_LANGUAL_CODE: &str = "
INSERT INTO food_langual_code (food_id, langual_id)
VALUES (?, (SELECT id FROM langual_code WHERE code = ?))";

/// Base food lookup by internal id.
pub fn food_by_id_query() -> String {
    format!("{}\nWHERE f.id = ?", SELECT_FOOD)
}

/// Base food lookup by public code.
pub fn food_by_code_query() -> String {
    format!("{}\nWHERE f.code = ?", SELECT_FOOD)
}

/// Reference lookup for `count` codes, one row per (reference, author).
///
/// `count` must be at least one; an empty `IN ()` list is not valid SQL.
pub fn references_query(count: usize) -> String {
    let placeholders = vec!["?"; count].join(", ");
    format!(
        "
SELECT r.code, r.title, r.type, r.other, r.year, c.name,
       r.page_start, r.page_end, r.volume, r.issue, r.volume_year,
       j.name, a.name
FROM reference_work r
LEFT JOIN city c ON c.id = r.city_id
LEFT JOIN journal j ON j.id = r.journal_id
LEFT JOIN reference_author ra ON ra.reference_code = r.code
LEFT JOIN author a ON a.id = ra.author_id
WHERE r.code IN ({})
ORDER BY r.code, ra.position",
        placeholders
    )
}
