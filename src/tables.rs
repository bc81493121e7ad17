//! Destination table definitions.
//!
//! Ordered `(column name, semantic type)` lists per classification,
//! consumed by sinks to build `CREATE TABLE IF NOT EXISTS` statements.
//! Every table starts with the two jurisdiction columns the importer
//! prepends and ends with the two provenance columns it appends, so an
//! imported row is self-describing without a join.

use crate::classify::{Category, FileClass, Subtype};

/// Semantic column type. Sinks map these onto their own type systems
/// (the SQLite sink uses TEXT/INTEGER/REAL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
}

/// One column of a destination table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub ty: ColumnType,
}

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Text,
    }
}

const fn int(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Integer,
    }
}

const fn real(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        ty: ColumnType::Real,
    }
}

/// Jurisdiction columns prepended to every row by the importer.
const LEADING: [ColumnSpec; 2] = [text("縣市代碼"), text("縣市名稱")];

/// Provenance columns appended to every row by the importer.
const TRAILING: [ColumnSpec; 2] = [text("source_file"), text("quarter")];

const RESALE_MAIN: &[ColumnSpec] = &[
    text("鄉鎮市區"),
    text("交易標的"),
    text("土地位置建物門牌"),
    real("土地移轉總面積平方公尺"),
    text("都市土地使用分區"),
    text("非都市土地使用分區"),
    text("非都市土地使用編定"),
    text("交易年月日"),
    int("交易筆棟數"),
    text("移轉層次"),
    int("總樓層數"),
    text("建物型態"),
    text("主要用途"),
    text("主要建材"),
    text("建築完成年月"),
    real("建物移轉總面積平方公尺"),
    int("建物現況格局-房"),
    int("建物現況格局-廳"),
    int("建物現況格局-衛"),
    text("建物現況格局-隔間"),
    text("有無管理組織"),
    real("總價元"),
    real("單價元平方公尺"),
    text("車位類別"),
    real("車位移轉總面積平方公尺"),
    real("車位總價元"),
    text("備註"),
    text("編號"),
    real("主建物面積"),
    real("附屬建物面積"),
    real("陽台面積"),
    text("電梯"),
    text("移轉編號"),
];

const PRESALE_MAIN: &[ColumnSpec] = &[
    text("鄉鎮市區"),
    text("交易標的"),
    text("土地位置建物門牌"),
    real("土地移轉總面積平方公尺"),
    text("都市土地使用分區"),
    text("非都市土地使用分區"),
    text("非都市土地使用編定"),
    text("交易年月日"),
    int("交易筆棟數"),
    text("移轉層次"),
    int("總樓層數"),
    text("建物型態"),
    text("主要用途"),
    text("主要建材"),
    text("建築完成年月"),
    real("建物移轉總面積平方公尺"),
    int("建物現況格局-房"),
    int("建物現況格局-廳"),
    int("建物現況格局-衛"),
    text("建物現況格局-隔間"),
    text("有無管理組織"),
    real("總價元"),
    real("單價元平方公尺"),
    text("車位類別"),
    real("車位移轉總面積平方公尺"),
    real("車位總價元"),
    text("備註"),
    text("編號"),
    text("建案名稱"),
    text("棟及號"),
    text("解約情形"),
];

const RENTAL_MAIN: &[ColumnSpec] = &[
    text("鄉鎮市區"),
    text("交易標的"),
    text("土地位置建物門牌"),
    real("土地面積平方公尺"),
    text("都市土地使用分區"),
    text("非都市土地使用分區"),
    text("非都市土地使用編定"),
    text("租賃年月日"),
    int("租賃筆棟數"),
    text("租賃層次"),
    int("總樓層數"),
    text("建物型態"),
    text("主要用途"),
    text("主要建材"),
    text("建築完成年月"),
    real("建物總面積平方公尺"),
    int("建物現況格局-房"),
    int("建物現況格局-廳"),
    int("建物現況格局-衛"),
    text("建物現況格局-隔間"),
    text("有無管理組織"),
    text("有無附傢俱"),
    real("總額元"),
    real("單價元平方公尺"),
    text("車位類別"),
    real("車位面積平方公尺"),
    real("車位總額元"),
    text("備註"),
    text("編號"),
    text("出租型態"),
    text("有無管理員"),
    text("租賃期間"),
    text("有無電梯"),
    text("附屬設備"),
    text("租賃住宅服務"),
];

const BUILDING: &[ColumnSpec] = &[
    text("編號"),
    int("屋齡"),
    real("建物移轉面積平方公尺"),
    text("主要用途"),
    text("主要建材"),
    text("建築完成日期"),
    int("總層數"),
    text("建物分層"),
    text("移轉情形"),
];

const LAND: &[ColumnSpec] = &[
    text("編號"),
    text("土地位置"),
    real("土地移轉面積平方公尺"),
    text("使用分區或編定"),
    real("權利人持分分母"),
    real("權利人持分分子"),
    text("移轉情形"),
    text("地號"),
];

const PARKING: &[ColumnSpec] = &[
    text("編號"),
    text("車位類別"),
    real("車位價格"),
    real("車位面積平方公尺"),
    text("車位所在樓層"),
];

/// Full ordered column list for a classification's destination table:
/// jurisdiction columns, the record body, then provenance columns.
pub fn table_columns(class: FileClass) -> Vec<ColumnSpec> {
    let body = match (class.category, class.subtype) {
        (Category::Resale, Subtype::Main) => RESALE_MAIN,
        (Category::Presale, Subtype::Main) => PRESALE_MAIN,
        (Category::Rental, Subtype::Main) => RENTAL_MAIN,
        (_, Subtype::Building) => BUILDING,
        (_, Subtype::Land) => LAND,
        (_, Subtype::Parking) => PARKING,
    };

    let mut columns = Vec::with_capacity(LEADING.len() + body.len() + TRAILING.len());
    columns.extend_from_slice(&LEADING);
    columns.extend_from_slice(body);
    columns.extend_from_slice(&TRAILING);
    columns
}

#[cfg(test)]
mod tests {
    use super::table_columns;
    use crate::classify::{Category, FileClass, Subtype};

    #[test]
    fn every_table_carries_jurisdiction_and_provenance_columns() {
        for category in [Category::Resale, Category::Presale, Category::Rental] {
            for subtype in [
                Subtype::Main,
                Subtype::Building,
                Subtype::Land,
                Subtype::Parking,
            ] {
                let columns = table_columns(FileClass { category, subtype });
                assert_eq!(columns[0].name, "縣市代碼");
                assert_eq!(columns[1].name, "縣市名稱");
                assert_eq!(columns[columns.len() - 2].name, "source_file");
                assert_eq!(columns[columns.len() - 1].name, "quarter");
            }
        }
    }

    #[test]
    fn main_tables_differ_per_category_sub_tables_do_not() {
        let resale = table_columns(FileClass {
            category: Category::Resale,
            subtype: Subtype::Main,
        });
        let rental = table_columns(FileClass {
            category: Category::Rental,
            subtype: Subtype::Main,
        });
        assert_ne!(resale, rental);

        let resale_land = table_columns(FileClass {
            category: Category::Resale,
            subtype: Subtype::Land,
        });
        let presale_land = table_columns(FileClass {
            category: Category::Presale,
            subtype: Subtype::Land,
        });
        assert_eq!(resale_land, presale_land);
    }
}
