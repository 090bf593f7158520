//! End-to-end pricing passes through the public engine.

mod support;

use fairline::domain::{Derivation, OfferKey, RawQuote, Side};
use fairline::engine::PricingEngine;
use fairline::testkit::config::{engine, permissive_engine, priority};
use fairline::testkit::domain::{head_to_head, hits_pair, lined, method_of_victory, quote};
use rust_decimal_macros::dec;

use support::assertions::{assert_distribution, assert_prob_near, side_prob};

fn slate() -> Vec<RawQuote> {
    let mut quotes = Vec::new();
    quotes.extend(hits_pair("Aaron Judge", "0.5", -180, 140, "draftkings"));
    quotes.extend(hits_pair("Aaron Judge", "0.5", -170, 135, "fanduel"));
    quotes.extend(hits_pair("Juan Soto", "1.5", 210, -280, "betmgm"));
    quotes.push(lined("Gerrit Cole", "pitcher_strikeouts", "7.5", "O", -115, "caesars"));
    quotes.push(lined("Gerrit Cole", "pitcher_strikeouts", "7.5", "U", -105, "fanduel"));
    quotes.push(lined("Shohei Ohtani", "batter_home_runs", "0.5", "Yes", 260, "draftkings"));
    quotes.push(lined("Shohei Ohtani", "batter_home_runs", "0.5", "Over", 275, "caesars"));
    quotes
}

#[test]
fn every_market_is_a_distribution() {
    let outcome = engine().run("mlb", &slate());
    assert_eq!(outcome.markets.len(), 4);
    for market in &outcome.markets {
        assert_distribution(market);
    }
    assert_eq!(outcome.report.accepted, slate().len());
}

#[test]
fn two_way_example_prices() {
    let quotes = hits_pair("Aaron Judge", "1.5", 105, -125, "draftkings");
    let outcome = engine().run("mlb", &quotes);

    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::TwoWay);
    assert_prob_near(side_prob(market, &Side::Over), 0.4675, 1e-4);
    assert_prob_near(side_prob(market, &Side::Under), 0.5325, 1e-4);
}

#[test]
fn single_sided_example_prices() {
    let quotes = vec![lined("Juan Soto", "batter_hits", "1.5", "Over", -120, "fanduel")];
    let outcome = engine().run("mlb", &quotes);

    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::SingleSided);
    assert_prob_near(side_prob(market, &Side::Over), 120.0 / 220.0, 1e-9);
    assert_prob_near(side_prob(market, &Side::Under), 100.0 / 220.0, 1e-9);
    assert_eq!(market.side(&Side::Over).map(|s| s.fair_american), Some(-120));
}

#[test]
fn n_way_method_of_victory() {
    let quotes = method_of_victory(
        "Jon Jones",
        &[("KO/TKO", 120), ("Submission", 250), ("Decision", 300)],
        "draftkings",
    );
    let outcome = engine().run("ufc", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::NWay);
    assert_eq!(market.sides.len(), 3);
    assert_distribution(market);
    assert_eq!(
        market.favorite().map(|s| &s.side),
        Some(&Side::Bucket("ko".into()))
    );
}

#[test]
fn lone_bucket_is_omitted_not_priced() {
    let mut quotes = method_of_victory("Jon Jones", &[("KO", 120)], "draftkings");
    quotes.extend(method_of_victory(
        "Stipe Miocic",
        &[("KO", 200), ("Decision", 180)],
        "draftkings",
    ));
    let outcome = engine().run("ufc", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    assert_eq!(outcome.markets[0].subject, "Stipe Miocic");
    assert_eq!(
        outcome.report.dropped_markets.get("insufficient_market_data"),
        Some(&1)
    );
}

#[test]
fn subject_name_in_label_does_not_split_a_yes_no_market() {
    let quotes = vec![
        quote("Jakobi Meyers", "player_anytime_td", "Yes", 150, "draftkings"),
        quote("Jakobi Meyers", "player_anytime_td", "No", -190, "draftkings"),
        quote("Jakobi Meyers", "player_anytime_td", "Jakobi Meyers No", -200, "caesars"),
    ];
    let outcome = engine().run("nfl", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    assert!(outcome.report.dropped_markets.is_empty());
    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::TwoWay);
    assert_distribution(market);
    let under = market.side(&Side::Under).unwrap();
    assert_eq!(under.offers.len(), 2);
    assert_eq!(under.shop.as_ref().unwrap().book.as_str(), "draftkings");
}

#[test]
fn bucket_aliases_are_ignored_outside_bucket_markets() {
    let quotes = vec![
        quote("Nikola Jokic", "player_triple_double", "Nikola Jokic No", -400, "fanduel"),
        quote("Nikola Jokic", "player_triple_double", "KO/TKO", 300, "fanduel"),
    ];
    let outcome = engine().run("nba", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    assert_eq!(outcome.markets[0].derivation, Derivation::SingleSided);
    assert_eq!(outcome.report.dropped_quotes.get("unrecognized_side"), Some(&1));
}

#[test]
fn moneyline_pair_is_two_way() {
    let quotes = head_to_head(
        "NYY @ BOS",
        &[("New York Yankees", 110), ("Boston Red Sox", -130)],
        "draftkings",
    );
    let outcome = engine().run("mlb", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::TwoWay);
    assert_distribution(market);
    // Named outcomes are emitted by label.
    let labels: Vec<_> = market.sides.iter().map(|s| s.side.to_string()).collect();
    assert_eq!(labels, vec!["Boston Red Sox", "New York Yankees"]);
    let boston = Side::Named("Boston Red Sox".into());
    assert_prob_near(side_prob(market, &boston), 0.5427, 1e-4);
}

#[test]
fn fighter_moneyline_is_shopped_across_books() {
    let mut quotes = head_to_head(
        "Jones vs Miocic",
        &[("Jon Jones", -300), ("Stipe Miocic", 250)],
        "fanduel",
    );
    quotes.extend(head_to_head("Jones vs Miocic", &[("Stipe Miocic", 270)], "caesars"));
    quotes.extend(head_to_head("Aspinall vs Blaydes", &[("Tom Aspinall", -500)], "fanduel"));
    let outcome = engine().run("ufc", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    let market = &outcome.markets[0];
    assert_eq!(market.derivation, Derivation::TwoWay);
    let miocic = market.side(&Side::Named("Stipe Miocic".into())).unwrap();
    assert_eq!(miocic.basis.as_ref().unwrap().book.as_str(), "fanduel");
    assert_eq!(miocic.shop.as_ref().unwrap().american.value(), 270);
    // A matchup with one named outcome cannot be priced.
    assert_eq!(
        outcome.report.dropped_markets.get("insufficient_market_data"),
        Some(&1)
    );
}

#[test]
fn priority_book_wins_in_either_arrival_order() {
    let engine = engine().with_priority(priority(&["fanduel", "draftkings"]));
    let p = lined("Aaron Judge", "batter_hits", "0.5", "Over", -150, "fanduel");
    let q = lined("Aaron Judge", "batter_hits", "0.5", "Over", -110, "caesars");

    for quotes in [vec![p.clone(), q.clone()], vec![q, p]] {
        let outcome = engine.run("mlb", &quotes);
        let over = outcome.markets[0].side(&Side::Over).unwrap();
        let basis = over.basis.as_ref().unwrap();
        assert_eq!(basis.book.as_str(), "fanduel");
        assert_eq!(basis.american.value(), -150);
        // The shop view still finds the better price elsewhere.
        assert_eq!(over.shop.as_ref().unwrap().book.as_str(), "caesars");
    }
}

#[test]
fn unranked_books_keep_the_first_quote_seen() {
    let engine = engine().with_priority(priority(&[]));
    let quotes = vec![
        lined("Aaron Judge", "batter_hits", "0.5", "Over", -150, "caesars"),
        lined("Aaron Judge", "batter_hits", "0.5", "Over", -110, "pointsbet"),
    ];
    let outcome = engine.run("mlb", &quotes);
    let over = outcome.markets[0].side(&Side::Over).unwrap();
    assert_eq!(over.basis.as_ref().unwrap().book.as_str(), "caesars");
}

#[test]
fn line_bounds_are_inclusive() {
    let quotes = vec![
        lined("Aaron Judge", "batter_hits", "3.5", "Over", 400, "fanduel"),
        lined("Juan Soto", "batter_hits", "3.6", "Over", 450, "fanduel"),
        lined("Juan Soto", "batter_hits", "0.5", "Over", -300, "fanduel"),
    ];
    let outcome = engine().run("mlb", &quotes);

    let subjects: Vec<_> = outcome
        .markets
        .iter()
        .map(|m| (m.subject.as_str(), m.line))
        .collect();
    assert_eq!(
        subjects,
        vec![("Aaron Judge", Some(dec!(3.5))), ("Juan Soto", Some(dec!(0.5)))]
    );
    assert_eq!(outcome.report.dropped_quotes.get("line_out_of_policy"), Some(&1));
}

#[test]
fn equivalent_line_spellings_share_a_key() {
    let quotes = vec![
        lined("Aaron Judge", "batter_hits", "1.5", "Over", 120, "fanduel"),
        lined("Aaron Judge", "batter_hits", "1.50", "Under", -140, "fanduel"),
        RawQuote::new("Aaron Judge", "batter_hits", "Under", -145, "draftkings").with_line(1.5),
    ];
    let outcome = engine().run("mlb", &quotes);
    assert_eq!(outcome.markets.len(), 1);
    assert_eq!(outcome.markets[0].derivation, Derivation::TwoWay);
    assert_eq!(
        outcome.markets[0].key(),
        OfferKey::new("Aaron Judge", "batter_hits", Some(dec!(1.5)))
    );
}

#[test]
fn near_duplicate_subjects_stay_separate() {
    let quotes = vec![
        lined("Aaron Judge", "batter_hits", "0.5", "Over", -180, "fanduel"),
        lined("Aaron  Judge", "batter_hits", "0.5", "Under", 140, "fanduel"),
    ];
    let outcome = engine().run("mlb", &quotes);
    assert_eq!(outcome.markets.len(), 2);
    assert!(outcome
        .markets
        .iter()
        .all(|m| m.derivation == Derivation::SingleSided));
}

#[test]
fn identical_input_serializes_identically() {
    let quotes = slate();
    let engine = engine();
    let first = serde_json::to_string(&engine.run("mlb", &quotes).markets).unwrap();
    let second = serde_json::to_string(&engine.run("mlb", &quotes).markets).unwrap();
    assert_eq!(first, second);

    // A fresh engine sees the same thing.
    let third = serde_json::to_string(&self::engine().run("mlb", &quotes).markets).unwrap();
    assert_eq!(first, third);
}

#[test]
fn shop_ties_do_not_depend_on_arrival_order() {
    let engine = engine();
    let mut quotes = vec![
        lined("Aaron Judge", "batter_hits", "0.5", "Over", 110, "caesars"),
        lined("Aaron Judge", "batter_hits", "0.5", "Over", 110, "betmgm"),
        lined("Aaron Judge", "batter_hits", "0.5", "Over", 110, "pointsbet"),
    ];
    let forward = serde_json::to_string(&engine.run("mlb", &quotes).markets).unwrap();
    quotes.reverse();
    let reverse = engine.run("mlb", &quotes);
    let over = reverse.markets[0].side(&Side::Over).unwrap();

    // betmgm is ranked; the others are not.
    assert_eq!(over.shop.as_ref().unwrap().book.as_str(), "betmgm");
    assert!(forward.contains("\"shop\":{\"book\":\"betmgm\""));
}

#[test]
fn messy_batch_never_aborts() {
    let quotes = vec![
        quote("Aaron Judge", "batter_hits", "Over", 0, "fanduel"),
        RawQuote::new("Aaron Judge", "batter_hits", "Over", "n/a", "fanduel").with_line("0.5"),
        lined("Aaron Judge", "batter_hits", "0.5", "Sideways", -110, "fanduel"),
        lined("Aaron Judge", "batter_hits", "half", "Over", -110, "fanduel"),
        lined("", "batter_hits", "0.5", "Over", -110, "fanduel"),
        lined("Aaron Judge", "batter_hits", "0.5", "Over", -110, "fanduel"),
    ];
    let outcome = engine().run("mlb", &quotes);

    assert_eq!(outcome.markets.len(), 1);
    let report = &outcome.report;
    assert_eq!(report.received, 6);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.quotes_dropped(), 5);
    assert_eq!(report.dropped_quotes.get("invalid_price"), Some(&2));
}

#[test]
fn json_batch_round_trip_through_engine() {
    let json = r#"[
        {"subject": "Gerrit Cole", "market_key": "pitcher_strikeouts", "line": "7.5",
         "side": "Over", "price": "-115", "source_book": "DraftKings", "event_id": "nyy-bos"},
        {"subject": "Gerrit Cole", "market_key": "pitcher_strikeouts", "line": 7.5,
         "side": "Under", "price": -105, "source_book": "DraftKings"},
        {"unexpected": "shape"}
    ]"#;
    let outcome = engine().run_json("mlb", json);

    assert_eq!(outcome.markets.len(), 1);
    let market = &outcome.markets[0];
    assert_eq!(market.event_id.as_ref().map(|e| e.as_str()), Some("nyy-bos"));
    assert_eq!(market.derivation, Derivation::TwoWay);
    assert_distribution(market);
    // The shapeless record deserializes to an empty quote and is dropped.
    assert_eq!(outcome.report.dropped_quotes.get("missing_field"), Some(&1));
}

#[test]
fn empty_input_is_a_normal_empty_result() {
    let engine = PricingEngine::default();
    assert!(engine.run("mlb", &Vec::<RawQuote>::new()).markets.is_empty());
    assert!(engine.run_json("mlb", "[]").markets.is_empty());
    assert!(engine.run_json("mlb", "").markets.is_empty());
}

#[test]
fn permissive_policy_accepts_unlisted_markets() {
    let quotes = hits_pair("Patrick Mahomes", "275.5", -110, -110, "fanduel")
        .into_iter()
        .map(|mut q| {
            q.market_key = "player_pass_yds".into();
            q
        })
        .collect::<Vec<_>>();

    assert_eq!(engine().run("nfl", &quotes).markets.len(), 1);
    assert!(engine().run("cfb", &quotes).markets.is_empty());
    assert_eq!(permissive_engine().run("cfb", &quotes).markets.len(), 1);
}
