//! Prompt templates for the tools' own model calls.
//!
//! Placeholders are written `{name}` and filled by [`fill`].

use tess_core::Document;

/// Placeholder used when a source category has nothing selected.
pub const NO_SOURCES: &str = "Geen bronnen beschikbaar.";

pub const ANSWER_TEMPLATE: &str = "Je bent een fiscaal adviseur. Hieronder staan een vraag van een gebruiker en de wetgeving en jurisprudentie die de gebruiker heeft goedgekeurd.

REGELS:
- Baseer je uitsluitend op de onderstaande bronnen en gebruik geen andere kennis.
- Zijn de bronnen onvoldoende om de vraag te beantwoorden, zeg dat dan expliciet en vraag om aanvullende bronnen.
- Verwijs naar concrete artikelen en uitspraken. Laat bronnen die niet relevant zijn weg.
- Antwoord in de taal van de vraag, nauwkeurig en bondig.

OPBOUW:
1) BRONNEN: de relevante titels, kort opgesomd. Meld het als geen enkele bron relevant is.
2) ANALYSE: onderbouw elke bewering met een van de genoemde bronnen.
3) ANTWOORD: sluit af met een kort en duidelijk antwoord op basis van de analyse.

VRAAG:
{query}

WETGEVING:
{legislation}

JURISPRUDENTIE:
{case_law}

Schrijf nu het antwoord volgens de REGELS en de OPBOUW, opgemaakt in markdown:";

pub const REMOVE_TEMPLATE: &str = "Bepaal welke bronnen uit de selectie van een dossier moeten worden gehaald.
Je krijgt de titels van de bronnen die nu geselecteerd zijn en een instructie van de gebruiker.
De instructie kan noemen wat weg moet, of juist wat moet blijven; in beide gevallen geef je de titels die weg moeten.

Geef alleen titels uit de lijst hieronder, letterlijk zoals ze daar staan. Geef geen toelichting.

INSTRUCTIE:
{instruction}

GESELECTEERDE BRONNEN:
{candidates}";

pub const RESTORE_TEMPLATE: &str = "Bepaal welke bronnen weer aan de selectie van een dossier moeten worden toegevoegd.
Je krijgt de titels van bronnen die in het dossier staan maar nu NIET geselecteerd zijn, en een verzoek van de gebruiker.
Voorbeelden van verzoeken: \"zet artikel 13 terug\", \"neem ECLI:NL:HR:2020:123 weer mee\".

Geef alleen titels uit de lijst hieronder, letterlijk zoals ze daar staan. Geef geen toelichting.

VERZOEK:
{query}

NIET-GESELECTEERDE BRONNEN:
{candidates}";

/// Replace each `{key}` in `template` with its value.
///
/// One pass over the template: inserted values are never scanned, so a
/// value that itself contains `{candidates}` stays as written. Unknown
/// placeholders are kept verbatim.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Number the sources as `i:\ntitle\ncontent` blocks.
pub fn format_sources(sources: &[&Document]) -> String {
    if sources.is_empty() {
        return NO_SOURCES.to_string();
    }
    sources
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("{}:\n{}\n{}", i + 1, doc.title, doc.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
