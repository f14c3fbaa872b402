//! Physics: the iterative force simulation driving the Force layout.

pub mod forces;
