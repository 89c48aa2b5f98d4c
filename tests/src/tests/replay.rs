use barrace::{PlayState, Player, Race};

use super::population;

#[test]
fn replay_ticks_through_every_frame() {
    let race = population();
    let mut player = Player::new(race.len());
    let mut periods = vec![race.period(player.index()).unwrap()];

    assert!(player.play());
    while let Some(index) = player.tick() {
        periods.push(race.period(index).unwrap());
    }
    assert_eq!(periods, race.timeline());
    assert_eq!(player.state(), PlayState::Paused);

    // play again from the end restarts
    assert!(player.play());
    assert_eq!(player.index(), 0);
}

#[test]
fn replay_survives_rebuild() {
    let race = population();
    let mut player = Player::new(race.len());
    player.seek(3);

    let shorter = Race::from_tuples([("2019", "France", 1.0), ("2020", "France", 2.0)]);
    player.set_len(shorter.len());
    assert_eq!(player.index(), 1);
    assert_eq!(shorter.clamp_index(3), Some(player.index()));
}
