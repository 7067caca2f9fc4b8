mod helpers;
mod webhook_test;
