mod integration;
mod http;
