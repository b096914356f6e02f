mod reader;
mod samples;
