//! Pin-level tests for the bit-banged SSC transport using mocked GPIO.

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use tle5012b::{BitBangSsc, DataDirection, SscInterface};

/// Clock expectations for one word: the constructor parks the clock low,
/// then every bit is a high/low pulse.
fn clock_expectations(words: usize) -> Vec<PinTransaction> {
    let mut sck = vec![PinTransaction::set(PinState::Low)];
    for _ in 0..words * 16 {
        sck.push(PinTransaction::set(PinState::High));
        sck.push(PinTransaction::set(PinState::Low));
    }
    sck
}

fn bit_state(word: u16, bit: u8) -> PinState {
    if word & (1 << bit) == 0 {
        PinState::Low
    } else {
        PinState::High
    }
}

#[test]
fn sends_word_msb_first() {
    let word = 0x8021;

    let data_expectations: Vec<PinTransaction> = (0..16)
        .rev()
        .map(|bit| PinTransaction::set(bit_state(word, bit)))
        .collect();

    let sck = PinMock::new(&clock_expectations(1));
    let data = PinMock::new(&data_expectations);
    let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut bus = BitBangSsc::new(sck, data, cs, NoopDelay::new()).unwrap();
    bus.send_words(&[word]).unwrap();

    let (mut sck, mut data, mut cs, _) = bus.release();
    sck.done();
    data.done();
    cs.done();
}

#[test]
fn receives_word_msb_first() {
    let word = 0xF0CE;

    let data_expectations: Vec<PinTransaction> = (0..16)
        .rev()
        .map(|bit| PinTransaction::get(bit_state(word, bit)))
        .collect();

    let sck = PinMock::new(&clock_expectations(1));
    let data = PinMock::new(&data_expectations);
    let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut bus = BitBangSsc::new(sck, data, cs, NoopDelay::new()).unwrap();

    let mut received = [0u16; 1];
    bus.receive_words(&mut received).unwrap();
    assert_eq!(received[0], word);

    let (mut sck, mut data, mut cs, _) = bus.release();
    sck.done();
    data.done();
    cs.done();
}

#[test]
fn select_drives_chip_select_low() {
    let sck = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let data = PinMock::new(&[]);
    let cs = PinMock::new(&[
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
    ]);

    let mut bus = BitBangSsc::new(sck, data, cs, NoopDelay::new()).unwrap();
    bus.select().unwrap();
    bus.deselect().unwrap();

    let (mut sck, mut data, mut cs, _) = bus.release();
    sck.done();
    data.done();
    cs.done();
}

#[test]
fn idle_lines_park_clock_low_and_data_high() {
    let sck = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::Low),
    ]);
    let data = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut bus = BitBangSsc::new(sck, data, cs, NoopDelay::new()).unwrap();
    bus.set_lines_idle().unwrap();

    let (mut sck, mut data, mut cs, _) = bus.release();
    sck.done();
    data.done();
    cs.done();
}

#[test]
fn input_direction_releases_the_data_line() {
    let sck = PinMock::new(&[PinTransaction::set(PinState::Low)]);
    let data = PinMock::new(&[PinTransaction::set(PinState::High)]);
    let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);

    let mut bus = BitBangSsc::new(sck, data, cs, NoopDelay::new()).unwrap();
    // output direction is implicit in driving the line, no pin traffic
    bus.set_data_direction(DataDirection::Output).unwrap();
    bus.set_data_direction(DataDirection::Input).unwrap();

    let (mut sck, mut data, mut cs, _) = bus.release();
    sck.done();
    data.done();
    cs.done();
}
