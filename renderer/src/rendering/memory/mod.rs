pub mod typed_buffer;
