use crate::aggregate::RankedRow;
use crate::normalize::{EntityRow, GroupKey, PredicateRow, TypedRow};

const NONE_CELL: &str = "''(none)''";

/// One wikitable row per ranked row; the row shape depends on the key type.
pub trait WikitextRow: GroupKey {
    fn render_row(&self, rank: usize, cnt: u64) -> String;
}

/// `rank | item | label | count`. An empty entity means "no value", shown
/// as an italic placeholder rather than a link.
impl WikitextRow for EntityRow {
    fn render_row(&self, rank: usize, cnt: u64) -> String {
        if self.entity.is_empty() {
            format!("|-\n| {rank} || {NONE_CELL} || {NONE_CELL} || {cnt}\n")
        } else {
            format!(
                "|-\n| {rank} || [[{}]] || {} || {cnt}\n",
                self.entity, self.label
            )
        }
    }
}

/// `rank | property | label | type | count`
impl WikitextRow for TypedRow {
    fn render_row(&self, rank: usize, cnt: u64) -> String {
        format!(
            "|-\n| {rank} || [[{}]] || {} || {} || {cnt}\n",
            self.entity, self.label, self.datatype
        )
    }
}

/// `rank | predicate | property | label | count`. Backlinks whose source is
/// not a property repeat the predicate in all three cells.
impl WikitextRow for PredicateRow {
    fn render_row(&self, rank: usize, cnt: u64) -> String {
        if self.entity.is_empty() {
            let p = &self.predicate;
            format!("|-\n| {rank} || {p} || {p} || {p} || {cnt}\n")
        } else {
            format!(
                "|-\n| {rank} || {} || [[{}]] || {} || {cnt}\n",
                self.predicate, self.entity, self.label
            )
        }
    }
}

pub fn render_table<K: WikitextRow>(rows: &[RankedRow<K>], column_names: &[&str]) -> String {
    let mut ret = format!(
        "{{| class=\"wikitable sortable\"\n|-\n! {}\n",
        column_names.join(" !! ")
    );
    for row in rows {
        ret += &row.key.render_row(row.rank, row.cnt);
    }
    ret += "|}";
    ret
}
