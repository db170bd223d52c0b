mod sequencer_tests;
mod support;
