use super::*;

/// Next-card choice for a study session.
///
/// Implementations receive the deck's cards and nothing else, so a real
/// scheduling policy (weighting by past feedback, spacing intervals) can be
/// swapped in later without touching any caller. An empty deck yields
/// `None`, which the handler layer reports as no-cards-in-deck rather than
/// an error.
pub trait Selector: Send + Sync {
    fn select<'a>(&self, cards: &'a [Card]) -> Option<&'a Card>;
}

/// Uniform random choice with replacement across calls. Keeps no memory of
/// prior selections and ignores stat history. This is the placeholder
/// policy; nothing smarter has been built yet.
pub struct Random;

impl Selector for Random {
    fn select<'a>(&self, cards: &'a [Card]) -> Option<&'a Card> {
        use rand::seq::IndexedRandom;
        cards.choose(&mut rand::rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardbox_core::ID;
    use cardbox_core::Unique;

    fn deck_of(n: usize) -> Vec<Card> {
        let deck = ID::default();
        (0..n)
            .map(|i| Card::new(ID::default(), format!("q{}", i), format!("a{}", i), deck))
            .collect()
    }

    #[test]
    fn empty_deck_yields_none() {
        assert!(Random.select(&[]).is_none());
    }

    #[test]
    fn singleton_deck_always_yields_its_card() {
        let cards = deck_of(1);
        for _ in 0..16 {
            assert_eq!(Random.select(&cards).map(|c| c.id()), Some(cards[0].id()));
        }
    }

    #[test]
    fn selection_stays_within_the_deck() {
        let cards = deck_of(8);
        let ids = cards.iter().map(|c| c.id()).collect::<Vec<_>>();
        for _ in 0..64 {
            let picked = Random.select(&cards).expect("non-empty");
            assert!(ids.contains(&picked.id()));
        }
    }

    #[test]
    fn every_card_is_eventually_selected() {
        let cards = deck_of(5);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            seen.insert(Random.select(&cards).expect("non-empty").id());
        }
        // P(missing any one card) ≈ 5 * 0.8^1000, vanishingly small
        assert_eq!(seen.len(), cards.len());
    }
}
