//! Filename classification.
//!
//! Quarterly LVR extracts encode what a file contains in its suffix:
//! `{city}_lvr_land_{a|b|c}[_build|_land|_park].csv`, where `a`/`b`/`c`
//! select the transaction category (resale / pre-sale / rental) and the
//! optional tail selects the sub-record kind. Classification is a pure
//! longest-suffix match against a fixed table of the twelve valid
//! suffixes; nothing here touches the filesystem.

use std::fmt;

/// Transaction category encoded by the `a`/`b`/`c` suffix letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Existing-home sales (中古屋), suffix letter `a`.
    Resale,
    /// Pre-sale contracts (預售屋), suffix letter `b`.
    Presale,
    /// Rentals (租屋), suffix letter `c`.
    Rental,
}

impl Category {
    /// The logical database this category's files are written into.
    pub fn database(self) -> Database {
        match self {
            Category::Resale => Database::UsedHouse,
            Category::Presale => Database::PreSale,
            Category::Rental => Database::Rental,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Category::Resale => "中古屋",
            Category::Presale => "預售屋",
            Category::Rental => "租屋",
        }
    }
}

/// Record kind within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtype {
    /// Main transaction record (no tail suffix).
    Main,
    /// Building sub-record (`_build`).
    Building,
    /// Land sub-record (`_land`).
    Land,
    /// Parking sub-record (`_park`).
    Parking,
}

impl Subtype {
    fn description(self) -> &'static str {
        match self {
            Subtype::Main => "主要資料",
            Subtype::Building => "建物資料",
            Subtype::Land => "土地資料",
            Subtype::Parking => "停車場資料",
        }
    }
}

/// One of the three physically separate destination databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    UsedHouse,
    PreSale,
    Rental,
}

impl Database {
    /// Database name as provisioned on the server.
    pub fn name(self) -> &'static str {
        match self {
            Database::UsedHouse => "LVR_UsedHouse",
            Database::PreSale => "LVR_PreSale",
            Database::Rental => "LVR_Rental",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of classifying a filename: what the file contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileClass {
    pub category: Category,
    pub subtype: Subtype,
}

impl FileClass {
    /// Destination `(database, table)` for this classification.
    ///
    /// The main record of each category gets a category-specific table;
    /// building/land/parking sub-records share table names across
    /// categories because the three categories write into three separate
    /// databases.
    pub fn target(self) -> TargetLocation {
        let table = match (self.category, self.subtype) {
            (Category::Resale, Subtype::Main) => "main_data",
            (Category::Presale, Subtype::Main) => "presale_data",
            (Category::Rental, Subtype::Main) => "rental_data",
            (_, Subtype::Building) => "build_data",
            (_, Subtype::Land) => "land_data",
            (_, Subtype::Parking) => "park_data",
        };
        TargetLocation {
            database: self.category.database(),
            table,
        }
    }

    /// Human-readable description, e.g. `中古屋主要資料`.
    pub fn description(self) -> String {
        format!(
            "{}{}",
            self.category.description(),
            self.subtype.description()
        )
    }
}

/// Destination of one classified file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLocation {
    pub database: Database,
    pub table: &'static str,
}

/// Ordered suffix table. Sub-record suffixes come before the bare
/// category suffixes: `x_a_build.csv` also ends in `d.csv` but must never
/// be tested against `_a.csv` first, so matching walks this table in
/// order and stops at the first hit.
const SUFFIXES: [(&str, Category, Subtype); 12] = [
    ("_a_build.csv", Category::Resale, Subtype::Building),
    ("_a_land.csv", Category::Resale, Subtype::Land),
    ("_a_park.csv", Category::Resale, Subtype::Parking),
    ("_b_build.csv", Category::Presale, Subtype::Building),
    ("_b_land.csv", Category::Presale, Subtype::Land),
    ("_b_park.csv", Category::Presale, Subtype::Parking),
    ("_c_build.csv", Category::Rental, Subtype::Building),
    ("_c_land.csv", Category::Rental, Subtype::Land),
    ("_c_park.csv", Category::Rental, Subtype::Parking),
    ("_a.csv", Category::Resale, Subtype::Main),
    ("_b.csv", Category::Presale, Subtype::Main),
    ("_c.csv", Category::Rental, Subtype::Main),
];

/// Classify a filename (no path) by its suffix.
///
/// Returns `None` for an unrecognized suffix; callers treat that as
/// skip-with-warning, not as a fatal error.
pub fn classify(filename: &str) -> Option<FileClass> {
    SUFFIXES
        .iter()
        .find(|(suffix, _, _)| filename.ends_with(suffix))
        .map(|&(_, category, subtype)| FileClass { category, subtype })
}

/// All supported suffixes, in match order.
pub fn all_suffixes() -> impl Iterator<Item = &'static str> {
    SUFFIXES.iter().map(|(s, _, _)| *s)
}

#[cfg(test)]
mod tests {
    use super::{classify, Category, Database, Subtype};

    #[test]
    fn twelve_suffixes_classify_to_expected_pairs() {
        let cases = [
            ("a_lvr_land_a.csv", Category::Resale, Subtype::Main),
            ("a_lvr_land_a_build.csv", Category::Resale, Subtype::Building),
            ("a_lvr_land_a_land.csv", Category::Resale, Subtype::Land),
            ("a_lvr_land_a_park.csv", Category::Resale, Subtype::Parking),
            ("a_lvr_land_b.csv", Category::Presale, Subtype::Main),
            ("a_lvr_land_b_build.csv", Category::Presale, Subtype::Building),
            ("a_lvr_land_b_land.csv", Category::Presale, Subtype::Land),
            ("a_lvr_land_b_park.csv", Category::Presale, Subtype::Parking),
            ("a_lvr_land_c.csv", Category::Rental, Subtype::Main),
            ("a_lvr_land_c_build.csv", Category::Rental, Subtype::Building),
            ("a_lvr_land_c_land.csv", Category::Rental, Subtype::Land),
            ("a_lvr_land_c_park.csv", Category::Rental, Subtype::Parking),
        ];
        for (name, category, subtype) in cases {
            let class = classify(name).unwrap_or_else(|| panic!("{name} did not classify"));
            assert_eq!(class.category, category, "{name}");
            assert_eq!(class.subtype, subtype, "{name}");
        }
    }

    #[test]
    fn sub_record_suffix_is_not_confused_with_main() {
        // `x_a_build.csv` ends in `d.csv`, not `_a.csv`; it must classify
        // as a building record, never as main or as unclassifiable.
        let class = classify("x_a_build.csv").unwrap();
        assert_eq!(class.subtype, Subtype::Building);
        assert_eq!(class.category, Category::Resale);
    }

    #[test]
    fn unknown_suffix_is_unclassifiable() {
        assert!(classify("unknown_file.csv").is_none());
        assert!(classify("a_lvr_land_d.csv").is_none());
        assert!(classify("notes.txt").is_none());
    }

    #[test]
    fn targets_route_main_per_category_and_share_sub_tables() {
        let main = classify("f_lvr_land_b.csv").unwrap().target();
        assert_eq!(main.database, Database::PreSale);
        assert_eq!(main.table, "presale_data");

        let resale_build = classify("f_lvr_land_a_build.csv").unwrap().target();
        let rental_build = classify("f_lvr_land_c_build.csv").unwrap().target();
        assert_eq!(resale_build.table, "build_data");
        assert_eq!(rental_build.table, "build_data");
        assert_ne!(resale_build.database, rental_build.database);
    }
}
