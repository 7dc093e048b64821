use std::fmt::Write;

use chess_with_guns_core::PlayerId;

use crate::MatchStatistics;

/// Formats the statistics as comma separated values with a header row.
///
/// Columns are `turn`, then `<name>_health` and `<name>_damage` per player,
/// then `distance`. An undefined distance is left empty.
#[must_use]
pub fn format_csv(statistics: &MatchStatistics) -> String {
    let mut csv = String::from("turn");
    for name in statistics.names() {
        let column = sanitize(name);
        let _ = write!(csv, ",{column}_health,{column}_damage");
    }
    csv.push_str(",distance\n");

    for sample in statistics.samples() {
        let _ = write!(csv, "{}", sample.turn);
        for player in &sample.players {
            let _ = write!(csv, ",{:.2},{:.2}", player.health, player.damage_dealt);
        }
        match sample.distance {
            Some(distance) => {
                let _ = writeln!(csv, ",{distance:.3}");
            }
            None => csv.push_str(",\n"),
        }
    }

    csv
}

/// Formats the statistics in the headerless layout read by the plotting script.
///
/// Each row holds black health, black damage, white health, white damage and
/// the distance between them. An undefined distance is written as `inf`.
/// Turns missing either player are skipped.
#[must_use]
pub fn format_plot_csv(statistics: &MatchStatistics, black: PlayerId, white: PlayerId) -> String {
    let mut csv = String::new();
    for sample in statistics.samples() {
        let player = |id: PlayerId| sample.players.get(id.get() as usize);
        let (Some(black), Some(white)) = (player(black), player(white)) else {
            continue;
        };
        let _ = write!(
            csv,
            "{:.2},{:.2},{:.2},{:.2},",
            black.health, black.damage_dealt, white.health, white.damage_dealt
        );
        match sample.distance {
            Some(distance) => {
                let _ = writeln!(csv, "{distance:.3}");
            }
            None => csv.push_str("inf\n"),
        }
    }
    csv
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
