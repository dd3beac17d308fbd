//! SQL text for the `theme_presets` seed migration.
//!
//! The statement is a single multi-row `INSERT ... ON CONFLICT (slug) DO
//! UPDATE`, so re-running the migration refreshes existing presets in place.

/// Static header: migration banner plus the `INSERT` column list.
pub const HEADER: &str = "\
-- ============================================================
-- Migration 078: Seed 10 Production Theme Presets
-- Date: 2026-01-20
-- Purpose: Insert production-ready theme templates into theme_presets with Bilingual Support
-- ============================================================

-- Insert 10 production themes into theme_presets table
INSERT INTO theme_presets (name, slug, category, description, preset_data, sort_order) VALUES
";

/// Upsert clause covering every non-key column.
pub const FOOTER: &str = "
ON CONFLICT (slug) DO UPDATE SET
    name = EXCLUDED.name,
    category = EXCLUDED.category,
    description = EXCLUDED.description,
    preset_data = EXCLUDED.preset_data,
    sort_order = EXCLUDED.sort_order,
    updated_at = CURRENT_TIMESTAMP;
";

/// One row of the `VALUES` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRow {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    /// Compact JSON of the full theme document.
    pub preset_data: String,
    pub sort_order: u32,
}

/// Single-quoted SQL string literal with embedded quotes doubled.
pub fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Dollar-quoted string constant. Plain `$$` is used unless the body
/// contains it, in which case a `$seed$` tag (with a numeric suffix if
/// needed) is picked that does not occur in the body.
pub fn dollar_quote(body: &str) -> String {
    if !body.contains("$$") {
        return format!("$${body}$$");
    }
    let mut tag = "$seed$".to_string();
    let mut n = 0u32;
    while body.contains(&tag) {
        n += 1;
        tag = format!("$seed{n}$");
    }
    format!("{tag}{body}{tag}")
}

impl SeedRow {
    /// Render as a parenthesized row constructor, one field per line.
    pub fn to_sql(&self) -> String {
        format!(
            "(\n    {},\n    {},\n    {},\n    {},\n    {}::jsonb,\n    {}\n)",
            quote_literal(&self.name),
            quote_literal(&self.slug),
            quote_literal(&self.category),
            quote_literal(&self.description),
            dollar_quote(&self.preset_data),
            self.sort_order,
        )
    }
}

/// Full migration text: header, rows joined by `,\n`, footer.
pub fn render_statement(rows: &[SeedRow]) -> String {
    let values: Vec<String> = rows.iter().map(SeedRow::to_sql).collect();
    let mut sql = String::with_capacity(
        HEADER.len() + FOOTER.len() + values.iter().map(|v| v.len() + 2).sum::<usize>(),
    );
    sql.push_str(HEADER);
    sql.push_str(&values.join(",\n"));
    sql.push_str(FOOTER);
    sql
}
