// Copyright 2021 Nir H. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A minimal frontend: loads a ROM, runs it, and shows the framebuffer in a
//! window using `minifb`.

use std::env;
use std::fmt;
use std::fs;

use dmg_core::bus::joypad::Button;
use dmg_core::bus::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};
use dmg_core::{CartridgeError, Config, Machine};
use minifb::{Key, Window, WindowOptions};

const KEYMAP: &[(Key, Button)] = &[
    (Key::Right, Button::Right),
    (Key::Left, Button::Left),
    (Key::Down, Button::Down),
    (Key::Up, Button::Up),
    (Key::Z, Button::A),
    (Key::X, Button::B),
    (Key::Space, Button::Select),
    (Key::Enter, Button::Start),
];

fn update_input(machine: &mut Machine, window: &Window) {
    for (key, button) in KEYMAP {
        if window.is_key_down(*key) {
            machine.press(*button);
        } else {
            machine.release(*button);
        }
    }
}

enum EmulatorError {
    Io(std::io::Error),
    Cartridge(CartridgeError),
}

impl From<std::io::Error> for EmulatorError {
    fn from(e: std::io::Error) -> Self {
        EmulatorError::Io(e)
    }
}

impl From<CartridgeError> for EmulatorError {
    fn from(e: CartridgeError) -> Self {
        EmulatorError::Cartridge(e)
    }
}

impl fmt::Debug for EmulatorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EmulatorError::Io(err) => err.fmt(f),
            EmulatorError::Cartridge(err) => err.fmt(f),
        }
    }
}

fn main() -> Result<(), EmulatorError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let rom_fname = args.get(1).expect("usage: emulator <rom-path>");
    let rom = fs::read(rom_fname)?;

    let config = Config::default();
    let mut machine = Machine::new(&config, rom)?;

    let mut window = Window::new(
        machine.cartridge_title(),
        SCREEN_WIDTH,
        SCREEN_HEIGHT,
        WindowOptions::default(),
    )
    .expect("failed to open display window");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        update_input(&mut machine, &window);
        machine.step_until_frame();
        window
            .update_with_buffer(machine.framebuffer(), SCREEN_WIDTH, SCREEN_HEIGHT)
            .expect("failed to present framebuffer");
    }

    Ok(())
}
