//! Board wiring and task layout (ESP32-S3 devkit + ICM-42670-P breakout).
//!
//! | Signal          | GPIO | Notes                         |
//! |-----------------|------|-------------------------------|
//! | I2C SDA / SCL   | 10/8 | motion sensor                 |
//! | Button A        | 0    | active low, arm / to Sending  |
//! | Button B        | 14   | active low, mode cycle        |
//! | LED             | 2    | indicator light               |
//! | Buzzer          | 4    | passive, LEDC channel 0       |
//! | Console TX / RX | 43/44| UART0                         |
//! | Peer TX / RX    | 17/18| UART1                         |

pub const I2C_BAUD_HZ: u32 = 400_000;
pub const CONSOLE_BAUD: u32 = 115_200;
pub const PEER_BAUD: u32 = 9600;

/// FreeRTOS priorities: higher runs first.
pub const SAMPLER_PRIORITY: u8 = 5;
pub const LINE_READER_PRIORITY: u8 = 4;
pub const AGGREGATOR_PRIORITY: u8 = 3;
pub const RENDERER_PRIORITY: u8 = 3;

/// Task stacks in bytes. Tasks holding a word buffer get the larger size.
pub const SAMPLER_STACK: usize = 4096;
pub const WORD_TASK_STACK: usize = 8192;

/// Supervisor loop period (log drain, interrupt re-arm).
pub const SUPERVISOR_PERIOD_MS: u32 = 20;
