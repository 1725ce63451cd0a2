mod forecast_api;
mod helpers;
mod ui_fragments;
