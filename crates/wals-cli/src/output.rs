//! Rendering of query results, as plain text or JSON.

use std::io::{self, Write};

use wals_core::language::LanguageProfile;

/// Write `profiles` to `out`, one block per language.
pub fn write_languages<W: Write>(
  out: &mut W,
  profiles: &[LanguageProfile],
  json: bool,
) -> anyhow::Result<()> {
  if json {
    serde_json::to_writer_pretty(&mut *out, profiles)?;
    writeln!(out)?;
    return Ok(());
  }

  if profiles.is_empty() {
    writeln!(out, "no matching languages")?;
  }
  for profile in profiles {
    write_profile(out, profile)?;
  }
  Ok(())
}

fn write_profile<W: Write>(out: &mut W, p: &LanguageProfile) -> io::Result<()> {
  writeln!(out, "{} [{}]", p.name, p.code)?;
  writeln!(out, "  family:    {}", p.family)?;
  writeln!(out, "  genus:     {}", p.genus)?;
  if !p.subfamily.is_empty() {
    writeln!(out, "  subfamily: {}", p.subfamily)?;
  }
  if !p.iso_codes.is_empty() {
    writeln!(out, "  iso codes: {}", p.iso_codes)?;
  }
  writeln!(
    out,
    "  location:  {}, {}",
    coordinate(p.location.latitude),
    coordinate(p.location.longitude)
  )?;
  for (feature, value) in &p.features {
    writeln!(out, "  - {feature}: {value}")?;
  }
  Ok(())
}

fn coordinate(c: Option<f64>) -> String {
  c.map_or_else(|| "?".to_owned(), |v| v.to_string())
}
