use crate::game::event::{BookEvent, DrawEvent, ExchangeEvent, GameEvent};
use crate::model::rank::Rank;
use std::collections::BTreeMap;

/// Bit-mask of ranks known with certainty to be absent from a hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RankMask(u16);

impl RankMask {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, rank: Rank) -> bool {
        let bit = 1u16 << rank.index();
        self.0 & bit != 0
    }

    pub fn with(mut self, rank: Rank) -> Self {
        let bit = 1u16 << rank.index();
        self.0 |= bit;
        self
    }

    pub fn without(mut self, rank: Rank) -> Self {
        let bit = 1u16 << rank.index();
        self.0 &= !bit;
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn ranks(self) -> impl Iterator<Item = Rank> {
        Rank::ORDERED.iter().copied().filter(move |r| self.contains(*r))
    }
}

/// What one player can soundly conclude about a single opponent's hand
/// from witnessed events alone.
///
/// `confirmed` counts are lower bounds per rank; `hand_size` is exact. The
/// slack between the two is the number of cards drawn opaquely from the
/// deck and never revealed since. An absence fact reflects the last
/// explicit revelation: opaque draws do not retract it, only an exchange
/// that visibly delivers the rank does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpponentBelief {
    confirmed: [u8; 13],
    hand_size: u8,
    revealed_absent: RankMask,
}

impl OpponentBelief {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirmed_count(&self, rank: Rank) -> u8 {
        self.confirmed[rank.index()]
    }

    pub fn hand_size(&self) -> u8 {
        self.hand_size
    }

    pub fn revealed_absent(&self) -> RankMask {
        self.revealed_absent
    }

    pub fn is_revealed_absent(&self, rank: Rank) -> bool {
        self.revealed_absent.contains(rank)
    }

    /// Cards in the hand whose identity is unknown.
    pub fn unknown_cards(&self) -> u8 {
        let confirmed_total: u8 = self.confirmed.iter().sum();
        self.hand_size.saturating_sub(confirmed_total)
    }

    fn note_draw(&mut self) {
        self.hand_size = self.hand_size.saturating_add(1);
    }

    fn note_received(&mut self, rank: Rank, count: u8) {
        if count == 0 {
            return;
        }
        self.confirmed[rank.index()] = self.confirmed[rank.index()].saturating_add(count);
        self.hand_size = self.hand_size.saturating_add(count);
        self.revealed_absent = self.revealed_absent.without(rank);
    }

    fn note_gave(&mut self, rank: Rank, count: u8) {
        let slot = &mut self.confirmed[rank.index()];
        *slot = slot.saturating_sub(count);
        self.hand_size = self.hand_size.saturating_sub(count);
        // Closed world: landing on zero is a confirmation of absence, and
        // covers the zero-card failed-request exchange as well.
        if *slot == 0 {
            self.revealed_absent = self.revealed_absent.with(rank);
        }
    }

    fn note_book(&mut self, rank: Rank) {
        self.confirmed[rank.index()] = 0;
        self.hand_size = self.hand_size.saturating_sub(4);
        // All four copies left play; the rank can never return.
        self.revealed_absent = self.revealed_absent.with(rank);
    }
}

/// Per-player belief model over every opponent. The owning player has no
/// record for itself; it sees its own hand directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationSpace {
    owner: usize,
    records: BTreeMap<usize, OpponentBelief>,
}

impl ObservationSpace {
    pub fn new(owner: usize, opponents: &[usize]) -> Self {
        let records = opponents
            .iter()
            .map(|&index| (index, OpponentBelief::new()))
            .collect();
        Self { owner, records }
    }

    pub fn owner(&self) -> usize {
        self.owner
    }

    pub fn opponents(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.keys().copied()
    }

    pub fn opponent(&self, index: usize) -> Option<&OpponentBelief> {
        self.records.get(&index)
    }

    pub fn update(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Draw(draw) => self.apply_draw(draw),
            GameEvent::Exchange(exchange) => self.apply_exchange(exchange),
            GameEvent::Book(book) => self.apply_book(book),
        }
    }

    fn apply_draw(&mut self, event: &DrawEvent) {
        if let Some(record) = self.records.get_mut(&event.player) {
            record.note_draw();
        }
    }

    fn apply_exchange(&mut self, event: &ExchangeEvent) {
        let count = event.cards.len() as u8;
        if let Some(receiver) = self.records.get_mut(&event.to_player) {
            receiver.note_received(event.rank, count);
        }
        if let Some(giver) = self.records.get_mut(&event.from_player) {
            giver.note_gave(event.rank, count);
        }
    }

    fn apply_book(&mut self, event: &BookEvent) {
        if let Some(record) = self.records.get_mut(&event.player) {
            record.note_book(event.rank);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ObservationSpace, RankMask};
    use crate::game::event::{BookEvent, DrawEvent, ExchangeEvent, GameEvent};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn space_for_player_zero() -> ObservationSpace {
        ObservationSpace::new(0, &[1, 2, 3])
    }

    fn draw(player: usize) -> GameEvent {
        DrawEvent::from_deck(player, Card::new(Rank::Two, Suit::Clubs)).into()
    }

    fn exchange(from: usize, to: usize, rank: Rank, count: usize) -> GameEvent {
        let cards = Suit::ALL
            .iter()
            .take(count)
            .map(|&suit| Card::new(rank, suit))
            .collect();
        ExchangeEvent {
            from_player: from,
            to_player: to,
            rank,
            cards,
        }
        .into()
    }

    #[test]
    fn rank_mask_set_and_clear() {
        let mask = RankMask::EMPTY.with(Rank::Seven).with(Rank::Ace);
        assert!(mask.contains(Rank::Seven));
        assert!(mask.contains(Rank::Ace));
        assert!(!mask.contains(Rank::Two));
        let cleared = mask.without(Rank::Seven);
        assert!(!cleared.contains(Rank::Seven));
        assert_eq!(mask.ranks().count(), 2);
        assert!(RankMask::EMPTY.is_empty());
    }

    #[test]
    fn no_record_for_the_owner() {
        let space = space_for_player_zero();
        assert!(space.opponent(0).is_none());
        assert_eq!(space.opponents().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn draws_raise_hand_size_but_reveal_nothing() {
        let mut space = space_for_player_zero();
        space.update(&draw(1));
        space.update(&draw(1));
        let record = space.opponent(1).unwrap();
        assert_eq!(record.hand_size(), 2);
        assert_eq!(record.unknown_cards(), 2);
        for rank in Rank::ORDERED {
            assert_eq!(record.confirmed_count(rank), 0);
        }
    }

    #[test]
    fn own_draws_are_ignored() {
        let mut space = space_for_player_zero();
        space.update(&draw(0));
        for opponent in [1, 2, 3] {
            assert_eq!(space.opponent(opponent).unwrap().hand_size(), 0);
        }
    }

    #[test]
    fn exchange_confirms_cards_for_the_receiver() {
        let mut space = space_for_player_zero();
        space.update(&draw(1));
        space.update(&draw(1));
        space.update(&exchange(1, 2, Rank::Seven, 2));
        let receiver = space.opponent(2).unwrap();
        assert_eq!(receiver.confirmed_count(Rank::Seven), 2);
        assert_eq!(receiver.hand_size(), 2);
        let giver = space.opponent(1).unwrap();
        assert_eq!(giver.confirmed_count(Rank::Seven), 0);
        assert_eq!(giver.hand_size(), 0);
        assert!(giver.is_revealed_absent(Rank::Seven));
    }

    #[test]
    fn failed_request_records_absence_without_moving_cards() {
        let mut space = space_for_player_zero();
        space.update(&draw(1));
        space.update(&exchange(1, 2, Rank::Queen, 0));
        let giver = space.opponent(1).unwrap();
        assert_eq!(giver.hand_size(), 1);
        assert!(giver.is_revealed_absent(Rank::Queen));
        let receiver = space.opponent(2).unwrap();
        assert_eq!(receiver.hand_size(), 0);
        assert!(!receiver.is_revealed_absent(Rank::Queen));
    }

    #[test]
    fn explicit_redelivery_clears_absence() {
        let mut space = space_for_player_zero();
        space.update(&exchange(1, 2, Rank::Seven, 0));
        assert!(space.opponent(1).unwrap().is_revealed_absent(Rank::Seven));
        space.update(&exchange(2, 1, Rank::Seven, 1));
        let record = space.opponent(1).unwrap();
        assert!(!record.is_revealed_absent(Rank::Seven));
        assert_eq!(record.confirmed_count(Rank::Seven), 1);
    }

    #[test]
    fn absence_survives_opaque_draws() {
        let mut space = space_for_player_zero();
        space.update(&exchange(1, 2, Rank::Seven, 0));
        space.update(&draw(1));
        let record = space.opponent(1).unwrap();
        assert!(record.is_revealed_absent(Rank::Seven));
        assert_eq!(record.unknown_cards(), 1);
    }

    #[test]
    fn book_zeroes_the_rank_exactly() {
        let mut space = space_for_player_zero();
        for _ in 0..4 {
            space.update(&draw(1));
        }
        space.update(&exchange(2, 1, Rank::Nine, 2));
        space.update(
            &BookEvent {
                player: 1,
                rank: Rank::Nine,
            }
            .into(),
        );
        let record = space.opponent(1).unwrap();
        assert_eq!(record.confirmed_count(Rank::Nine), 0);
        assert_eq!(record.hand_size(), 2);
        assert!(record.is_revealed_absent(Rank::Nine));
    }

    #[test]
    fn hand_size_never_undershoots_confirmed_counts() {
        let mut space = space_for_player_zero();
        space.update(&exchange(2, 1, Rank::Five, 3));
        space.update(&draw(1));
        let record = space.opponent(1).unwrap();
        let confirmed_total: u8 = Rank::ORDERED
            .iter()
            .map(|&r| record.confirmed_count(r))
            .sum();
        assert!(record.hand_size() >= confirmed_total);
        assert_eq!(record.unknown_cards(), 1);
    }
}
