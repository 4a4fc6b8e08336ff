/// 1:1 deck description record.
///
/// Kept out of the deck row so the (potentially long) description can be
/// updated on its own cadence without touching deck metadata. Descriptions
/// travel as plain strings; this type exists to own the table schema.
pub struct Blurb;

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use cardbox_pg::*;

    impl Schema for Blurb {
        fn name() -> &'static str {
            BLURBS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                BLURBS,
                " (
                    deck_id     UUID PRIMARY KEY REFERENCES ",
                DECKS,
                "(id) ON DELETE CASCADE,
                    body        VARCHAR(2500) NOT NULL DEFAULT ''
                );"
            )
        }
        fn indices() -> &'static str {
            // primary key suffices; lookups are always by deck
            ""
        }
    }
}

#[cfg(all(test, feature = "database"))]
mod tests {
    use super::*;
    use cardbox_pg::*;

    #[test]
    fn schema_keys_descriptions_by_deck() {
        assert_eq!(<Blurb as Schema>::name(), BLURBS);
        let ddl = <Blurb as Schema>::creates();
        assert!(ddl.contains("deck_id     UUID PRIMARY KEY"));
        assert!(ddl.contains("ON DELETE CASCADE"));
    }
}
