//! A small, multi-board BSP for TI SPL bring-up.
#![cfg_attr(not(test), no_std)]

pub mod am43xx_mini;

cfg_if::cfg_if! {
    if #[cfg(not(all(target_arch = "arm", target_os = "none")))] {
        // Host builds only carry the pad tables.
    } else if #[cfg(feature = "am625-sk")] {
        use panic_halt as _;

        mod am625_sk;
        pub use am625_sk::*;
    } else if #[cfg(feature = "am43xx-mini")] {
        use panic_halt as _;

        pub use am43xx_mini::prepare;
    } else {
        compile_error!("No board feature selected!");
    }
}
